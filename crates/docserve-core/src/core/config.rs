// crates/docserve-core/src/core/config.rs
// ============================================================================
// Module: Resolver Configuration
// Description: Immutable addressing configuration for resolver and unresolver.
// Purpose: Replace ambient settings reads with an explicit injected value.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ResolverConfig`] enumerates every deployment setting that influences URL
//! generation and parsing. It is passed by value into the resolver and
//! unresolver constructors; neither component reads global state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path segment prefixing project slugs in path-based serving mode.
pub const PATH_BASED_ROOT: &str = "docs";

/// Default prefix inserted before subproject aliases.
pub const DEFAULT_SUBPROJECT_PREFIX: &str = "/projects/";

/// Separator between project and version slug in external-version hostnames.
pub const EXTERNAL_VERSION_SEPARATOR: &str = "--";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Addressing configuration shared by the resolver and unresolver.
///
/// # Invariants
/// - Hostnames are lowercase, carry no scheme or port, and have no leading dot.
/// - `public_domain_suffix` and `external_domain_suffix` differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Suffix of public project subdomains (`{slug}.{suffix}`).
    pub public_domain_suffix: String,
    /// Suffix of external-version subdomains (`{slug}--{version}.{suffix}`).
    pub external_domain_suffix: String,
    /// Dashboard/production hostname; serves docs when subdomains are disabled.
    pub production_domain: String,
    /// Generate https URLs for public and external domains.
    pub public_domain_uses_https: bool,
    /// Serve projects from subdomains instead of `/docs/{slug}/` paths.
    pub use_subdomain: bool,
}

impl ResolverConfig {
    /// Returns the scheme used for public and external hostnames.
    #[must_use]
    pub const fn public_scheme(&self) -> &'static str {
        if self.public_domain_uses_https { "https" } else { "http" }
    }
}
