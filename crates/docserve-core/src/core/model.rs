// crates/docserve-core/src/core/model.rs
// ============================================================================
// Module: Docserve Data Model
// Description: Project, version, domain, and relationship records.
// Purpose: Read-only snapshots consumed by the resolver and unresolver.
// Dependencies: serde, crate::core::identifiers
// ============================================================================

//! ## Overview
//! These records mirror the hosting platform's relational model. The resolver
//! never mutates them; relationship traversal (subprojects, translations,
//! domains) goes through [`crate::interfaces::ProjectRepository`] so that the
//! records themselves stay flat and cheap to clone.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ProjectId;
use crate::core::identifiers::ProjectSlug;
use crate::core::identifiers::VersionId;
use crate::core::identifiers::VersionSlug;

// ============================================================================
// SECTION: Privacy
// ============================================================================

/// Privacy level attached to projects and versions.
///
/// Only visibility policies interpret this value; URL generation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    /// Visible to everyone.
    #[default]
    Public,
    /// Listed only to authorized users, reachable by direct link.
    Protected,
    /// Visible to authorized users only.
    Private,
}

impl PrivacyLevel {
    /// Returns a stable label for the privacy level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }

    /// Parses a stable label back into a privacy level.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Project
// ============================================================================

/// Documentation project snapshot.
///
/// # Invariants
/// - `slug` is unique across projects.
/// - `main_language_project`, when set, marks this project as a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable project identifier.
    pub id: ProjectId,
    /// Unique slug used in subdomains and default paths.
    pub slug: ProjectSlug,
    /// Language code used in path-based URLs (e.g. `en`, `pt_BR`).
    pub language: String,
    /// Privacy level consulted by visibility policies.
    #[serde(default)]
    pub privacy_level: PrivacyLevel,
    /// Omit language and version segments from generated paths.
    #[serde(default)]
    pub single_version: bool,
    /// Prefix inserted before this project's language/version segments.
    #[serde(default)]
    pub custom_prefix: Option<String>,
    /// Prefix inserted before subproject aliases (defaults to `/projects/`).
    #[serde(default)]
    pub custom_subproject_prefix: Option<String>,
    /// Main project when this project is a translation.
    #[serde(default)]
    pub main_language_project: Option<ProjectId>,
    /// Default version slug (falls back to `latest`).
    #[serde(default)]
    pub default_version: Option<VersionSlug>,
}

impl Project {
    /// Creates a public, multi-version project with no prefixes or relations.
    #[must_use]
    pub fn new(id: ProjectId, slug: impl Into<ProjectSlug>, language: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            language: language.into(),
            privacy_level: PrivacyLevel::Public,
            single_version: false,
            custom_prefix: None,
            custom_subproject_prefix: None,
            main_language_project: None,
            default_version: None,
        }
    }

    /// Returns true when this project is a translation of another project.
    #[must_use]
    pub const fn is_translation(&self) -> bool {
        self.main_language_project.is_some()
    }
}

// ============================================================================
// SECTION: Version
// ============================================================================

/// Version source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// Built from a branch.
    Branch,
    /// Built from a tag.
    Tag,
    /// Pull/merge request preview build.
    External,
}

impl VersionType {
    /// Returns the coarse kind used for type matching.
    #[must_use]
    pub const fn kind(self) -> VersionKind {
        match self {
            Self::Branch | Self::Tag => VersionKind::Internal,
            Self::External => VersionKind::External,
        }
    }

    /// Returns a stable label for the version type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Tag => "tag",
            Self::External => "external",
        }
    }

    /// Parses a stable label back into a version type.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "branch" => Some(Self::Branch),
            "tag" => Some(Self::Tag),
            "external" => Some(Self::External),
            _ => None,
        }
    }
}

/// Internal versus external classification of versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKind {
    /// Branch or tag build served from the public scheme.
    Internal,
    /// Preview build served only from the external-version domain.
    External,
}

/// Documentation version snapshot.
///
/// # Invariants
/// - `slug` is unique within its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Stable version identifier.
    pub id: VersionId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Version slug used in URL paths.
    pub slug: VersionSlug,
    /// Version source type.
    #[serde(rename = "type")]
    pub version_type: VersionType,
    /// Privacy level consulted by visibility policies.
    #[serde(default)]
    pub privacy_level: PrivacyLevel,
}

impl Version {
    /// Returns true for pull/merge request preview builds.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self.version_type, VersionType::External)
    }
}

// ============================================================================
// SECTION: Domain
// ============================================================================

/// Custom hostname attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Hostname without scheme or port (e.g. `docs.example.com`).
    pub domain: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Authoritative domain for URL generation.
    #[serde(default)]
    pub canonical: bool,
    /// Serve over https.
    #[serde(default)]
    pub https: bool,
}

// ============================================================================
// SECTION: Subproject Relation
// ============================================================================

/// Parent/child link nesting a project under another project's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubprojectRelation {
    /// Superproject identifier.
    pub parent_id: ProjectId,
    /// Subproject identifier.
    pub child_id: ProjectId,
    /// Path segment overriding the child's slug.
    #[serde(default)]
    pub alias: Option<String>,
}

impl SubprojectRelation {
    /// Returns the path segment addressing `child` under its parent.
    ///
    /// The alias wins when present and non-blank; otherwise the child's slug.
    #[must_use]
    pub fn path_segment<'a>(&'a self, child: &'a Project) -> &'a str {
        match self.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.trim_matches('/'),
            _ => child.slug.as_str(),
        }
    }
}
