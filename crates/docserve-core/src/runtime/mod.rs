// crates/docserve-core/src/runtime/mod.rs
// ============================================================================
// Module: Docserve Runtime
// Description: Resolver, unresolver, and supporting runtime helpers.
// Purpose: Generate and parse documentation URLs against injected repositories.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement URL generation and parsing. Both directions share
//! the canonical-project walk and the path arithmetic so that resolver output
//! always unresolves back to the same project, version, and filename.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod canonical;
pub mod path;
pub mod policy;
pub mod resolver;
pub mod store;
pub mod unresolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use canonical::ProjectLocation;
pub use canonical::canonical_project;
pub use canonical::project_location;
pub use path::PathParts;
pub use path::compose_path;
pub use policy::PrivacyLevelPolicy;
pub use resolver::ResolveError;
pub use resolver::ResolveOptions;
pub use resolver::Resolver;
pub use store::InMemoryProjectStore;
pub use store::ProjectCatalog;
pub use unresolver::DomainSource;
pub use unresolver::UnresolveError;
pub use unresolver::UnresolvedDomain;
pub use unresolver::UnresolvedPath;
pub use unresolver::UnresolvedUrl;
pub use unresolver::Unresolver;
pub use unresolver::normalize_host;
