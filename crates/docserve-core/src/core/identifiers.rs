// crates/docserve-core/src/core/identifiers.rs
// ============================================================================
// Module: Docserve Identifiers
// Description: Opaque identifiers for projects and versions.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Numeric identifiers are the stable keys used for relationship lookups and
//! cycle detection; they enforce non-zero, 1-based invariants at construction
//! boundaries. Slugs are the human-facing names that appear in hostnames and
//! URL paths.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Numeric Identifiers
// ============================================================================

/// Project identifier.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
/// - Stable across repeated fetches of the same project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(NonZeroU64);

impl ProjectId {
    /// Creates a new project identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a project identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

/// Version identifier.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(NonZeroU64);

impl VersionId {
    /// Creates a new version identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a version identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Slugs
// ============================================================================

/// Project slug used in subdomains and default paths.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectSlug(String);

impl ProjectSlug {
    /// Creates a new project slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the slug is non-empty and has no ASCII uppercase.
    ///
    /// Slugs appear in hostnames, which are matched case-insensitively, so
    /// stores only accept slugs in this form.
    #[must_use]
    pub fn is_lowercase(&self) -> bool {
        !self.0.is_empty() && !self.0.bytes().any(|b| b.is_ascii_uppercase())
    }
}

impl fmt::Display for ProjectSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProjectSlug {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProjectSlug {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Version slug used in URL paths and external-version hostnames.
///
/// # Invariants
/// - Opaque UTF-8 string; `latest` and `stable` are reserved names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionSlug(String);

impl VersionSlug {
    /// Reserved slug tracking the default branch.
    pub const LATEST: &'static str = "latest";
    /// Reserved slug tracking the newest release.
    pub const STABLE: &'static str = "stable";

    /// Creates a new version slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Returns the reserved `latest` slug.
    #[must_use]
    pub fn latest() -> Self {
        Self::new(Self::LATEST)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for VersionSlug {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for VersionSlug {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
