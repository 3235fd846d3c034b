// crates/docserve-core/src/runtime/path.rs
// ============================================================================
// Module: Path Composition
// Description: Pure composition of documentation URL paths.
// Purpose: Combine nesting base, custom prefix, language, version, and filename.
// Dependencies: crate::core::prefix
// ============================================================================

//! ## Overview
//! Path composition never checks file existence and never appends an index
//! document; index resolution belongs to the serving layer. The output is
//! always absolute and free of doubled slashes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::prefix::join_url_path;
use crate::core::prefix::normalize_prefix;

// ============================================================================
// SECTION: Path Parts
// ============================================================================

/// Inputs to [`compose_path`].
#[derive(Debug, Clone, Copy)]
pub struct PathParts<'a> {
    /// Nesting base (serving-mode root plus subproject levels).
    pub base: &'a str,
    /// Custom prefix of the project whose pages are addressed.
    pub custom_prefix: Option<&'a str>,
    /// Omit language and version segments.
    pub single_version: bool,
    /// Language segment.
    pub language: &'a str,
    /// Version segment.
    pub version_slug: &'a str,
    /// Filename relative to the version root.
    pub filename: &'a str,
}

// ============================================================================
// SECTION: Composition
// ============================================================================

/// Strips leading slashes from a requested filename.
///
/// An empty result addresses the version root. `index.html` receives no
/// special treatment.
#[must_use]
pub fn normalize_filename(filename: &str) -> &str {
    filename.trim_start_matches('/')
}

/// Composes the path portion of a documentation URL.
#[must_use]
pub fn compose_path(parts: &PathParts<'_>) -> String {
    let prefix = normalize_prefix(parts.custom_prefix.unwrap_or("/"));
    let filename = normalize_filename(parts.filename);
    if parts.single_version {
        return join_url_path(&[parts.base, &prefix, filename]);
    }
    let language_version = format!("{}/{}/", parts.language, parts.version_slug);
    join_url_path(&[parts.base, &prefix, &language_version, filename])
}

// ============================================================================
// SECTION: Tests
// ============================================================================
