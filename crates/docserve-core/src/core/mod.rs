// crates/docserve-core/src/core/mod.rs
// ============================================================================
// Module: Docserve Core Types
// Description: Canonical project/version records and addressing configuration.
// Purpose: Provide stable, serializable types shared by resolver and unresolver.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe the documentation hosting model as seen by the URL
//! subsystem: projects, versions, custom domains, subproject relations, and
//! the addressing configuration. These types are the source of truth for
//! any derived surface (CLI output, storage rows).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod config;
pub mod identifiers;
pub mod model;
pub mod prefix;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::DEFAULT_SUBPROJECT_PREFIX;
pub use config::EXTERNAL_VERSION_SEPARATOR;
pub use config::PATH_BASED_ROOT;
pub use config::ResolverConfig;
pub use identifiers::ProjectId;
pub use identifiers::ProjectSlug;
pub use identifiers::VersionId;
pub use identifiers::VersionSlug;
pub use model::Domain;
pub use model::PrivacyLevel;
pub use model::Project;
pub use model::SubprojectRelation;
pub use model::Version;
pub use model::VersionKind;
pub use model::VersionType;
