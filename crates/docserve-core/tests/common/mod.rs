// crates/docserve-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared project families and configuration for core tests.
// Purpose: Build deterministic in-memory repositories for resolver tests.
// Dependencies: docserve-core
// ============================================================================

//! ## Overview
//! The `pip` family mirrors a typical hosted setup: a main project, a
//! Japanese subproject, a Japanese translation, and an external preview build.

#![allow(
    dead_code,
    clippy::unwrap_used,
    reason = "Shared test helpers may be unused in some cases."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use docserve_core::Domain;
use docserve_core::InMemoryProjectStore;
use docserve_core::PrivacyLevel;
use docserve_core::Project;
use docserve_core::ProjectId;
use docserve_core::ResolverConfig;
use docserve_core::Resolver;
use docserve_core::SubprojectRelation;
use docserve_core::Unresolver;
use docserve_core::Version;
use docserve_core::VersionId;
use docserve_core::VersionSlug;
use docserve_core::VersionType;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Subdomain-mode configuration with plain http.
#[must_use]
pub fn config() -> ResolverConfig {
    ResolverConfig {
        public_domain_suffix: "readthedocs.org".to_string(),
        external_domain_suffix: "readthedocs.build".to_string(),
        production_domain: "readthedocs.org".to_string(),
        public_domain_uses_https: false,
        use_subdomain: true,
    }
}

/// Path-based configuration serving from the production domain.
#[must_use]
pub fn path_based_config() -> ResolverConfig {
    ResolverConfig {
        use_subdomain: false,
        ..config()
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Builds a project id from a non-zero literal.
#[must_use]
pub fn pid(raw: u64) -> ProjectId {
    ProjectId::from_raw(raw).unwrap()
}

/// Builds a public multi-version project.
#[must_use]
pub fn project(id: u64, slug: &str, language: &str) -> Project {
    Project::new(pid(id), slug, language)
}

/// Builds a public version of `project`.
#[must_use]
pub fn version(id: u64, project: &Project, slug: &str, version_type: VersionType) -> Version {
    Version {
        id: VersionId::from_raw(id).unwrap(),
        project_id: project.id,
        slug: VersionSlug::new(slug),
        version_type,
        privacy_level: PrivacyLevel::Public,
    }
}

/// Builds a canonical https custom domain.
#[must_use]
pub fn custom_domain(project: &Project, hostname: &str) -> Domain {
    Domain {
        domain: hostname.to_string(),
        project_id: project.id,
        canonical: true,
        https: true,
    }
}

/// Builds a subproject relation.
#[must_use]
pub fn relation(parent: &Project, child: &Project, alias: Option<&str>) -> SubprojectRelation {
    SubprojectRelation {
        parent_id: parent.id,
        child_id: child.id,
        alias: alias.map(str::to_string),
    }
}

// ============================================================================
// SECTION: Families
// ============================================================================

/// Builder for the `pip` project family.
pub struct Family {
    /// Main project (`en`).
    pub pip: Project,
    /// Subproject of `pip` (`ja`).
    pub sub: Project,
    /// Japanese translation of `pip`.
    pub translation: Project,
    /// Alias of the subproject relation.
    pub alias: Option<String>,
    /// Canonical custom domain of `pip`.
    pub domain: Option<String>,
}

impl Family {
    /// Plain family: no alias, no custom domain, no prefixes.
    pub fn new() -> Self {
        let pip = project(1, "pip", "en");
        let sub = project(2, "sub", "ja");
        let translation = Project {
            main_language_project: Some(pip.id),
            ..project(3, "pip-ja", "ja")
        };
        Self {
            pip,
            sub,
            translation,
            alias: None,
            domain: None,
        }
    }

    /// Builds a fresh store holding the family.
    pub fn store(&self) -> InMemoryProjectStore {
        let store = InMemoryProjectStore::new();
        store.insert_project(self.pip.clone()).unwrap();
        store.insert_project(self.sub.clone()).unwrap();
        store.insert_project(self.translation.clone()).unwrap();
        store.insert_version(version(1, &self.pip, "latest", VersionType::Branch)).unwrap();
        store.insert_version(version(2, &self.pip, "stable", VersionType::Tag)).unwrap();
        store.insert_version(version(3, &self.pip, "10", VersionType::External)).unwrap();
        store.insert_version(version(4, &self.sub, "latest", VersionType::Branch)).unwrap();
        store.insert_version(version(5, &self.translation, "latest", VersionType::Branch)).unwrap();
        store.add_subproject(relation(&self.pip, &self.sub, self.alias.as_deref())).unwrap();
        if let Some(hostname) = &self.domain {
            store.insert_domain(custom_domain(&self.pip, hostname)).unwrap();
        }
        store
    }

    /// Resolver over a fresh store.
    pub fn resolver(&self) -> Resolver<InMemoryProjectStore> {
        Resolver::new(config(), self.store())
    }

    /// Unresolver over a fresh store.
    pub fn unresolver(&self) -> Unresolver<InMemoryProjectStore> {
        Unresolver::new(config(), self.store())
    }
}
