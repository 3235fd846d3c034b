// crates/docserve-core/src/runtime/policy.rs
// ============================================================================
// Module: Docserve Visibility Policy
// Description: Default privacy-level visibility policy.
// Purpose: Decide request-level visibility of unresolved documentation.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`PrivacyLevelPolicy`] grants access to public documentation
//! unconditionally and to protected or private documentation only when the
//! viewer is authorized for the owning project. A private version of a public
//! project stays hidden from unauthorized viewers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::PrivacyLevel;
use crate::core::Project;
use crate::core::ProjectId;
use crate::core::Version;
use crate::interfaces::PolicyError;
use crate::interfaces::Visibility;
use crate::interfaces::VisibilityPolicy;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Visibility policy keyed on privacy levels and per-project authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivacyLevelPolicy {
    /// Projects the viewer may access regardless of privacy level.
    authorized: BTreeSet<ProjectId>,
}

impl PrivacyLevelPolicy {
    /// Creates a policy for an anonymous viewer.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a policy for a viewer authorized on the given projects.
    #[must_use]
    pub fn authorized_for(projects: impl IntoIterator<Item = ProjectId>) -> Self {
        Self {
            authorized: projects.into_iter().collect(),
        }
    }

    /// Returns true when the viewer is authorized for `project`.
    #[must_use]
    pub fn is_authorized(&self, project: ProjectId) -> bool {
        self.authorized.contains(&project)
    }
}

impl VisibilityPolicy for PrivacyLevelPolicy {
    fn decide(
        &self,
        project: &Project,
        version: Option<&Version>,
    ) -> Result<Visibility, PolicyError> {
        let restricted = project.privacy_level != PrivacyLevel::Public
            || version.is_some_and(|version| version.privacy_level != PrivacyLevel::Public);
        if restricted && !self.is_authorized(project.id) {
            return Ok(Visibility::Hidden);
        }
        Ok(Visibility::Visible)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        reason = "Test fixtures use explicit unwraps for clarity."
    )]

    use super::*;
    use crate::core::VersionId;
    use crate::core::VersionSlug;
    use crate::core::VersionType;

    fn project(privacy_level: PrivacyLevel) -> Project {
        Project {
            privacy_level,
            ..Project::new(ProjectId::from_raw(1).unwrap(), "pip", "en")
        }
    }

    fn version(privacy_level: PrivacyLevel) -> Version {
        Version {
            id: VersionId::from_raw(1).unwrap(),
            project_id: ProjectId::from_raw(1).unwrap(),
            slug: VersionSlug::latest(),
            version_type: VersionType::Branch,
            privacy_level,
        }
    }

    #[test]
    fn public_documentation_is_visible_to_everyone() {
        let policy = PrivacyLevelPolicy::anonymous();
        let visibility =
            policy.decide(&project(PrivacyLevel::Public), Some(&version(PrivacyLevel::Public)));
        assert_eq!(visibility.unwrap(), Visibility::Visible);
    }

    #[test]
    fn private_version_requires_authorization() {
        let public = project(PrivacyLevel::Public);
        let private = version(PrivacyLevel::Private);
        let anonymous = PrivacyLevelPolicy::anonymous();
        assert_eq!(anonymous.decide(&public, Some(&private)).unwrap(), Visibility::Hidden);
        let member = PrivacyLevelPolicy::authorized_for([public.id]);
        assert_eq!(member.decide(&public, Some(&private)).unwrap(), Visibility::Visible);
    }

    #[test]
    fn protected_project_is_hidden_from_anonymous_viewers() {
        let policy = PrivacyLevelPolicy::anonymous();
        assert_eq!(
            policy.decide(&project(PrivacyLevel::Protected), None).unwrap(),
            Visibility::Hidden
        );
    }
}
