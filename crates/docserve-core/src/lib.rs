// crates/docserve-core/src/lib.rs
// ============================================================================
// Module: Docserve Core Library
// Description: Public API surface for documentation URL resolution.
// Purpose: Expose core types, repository interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Docserve core maps documentation projects to URLs and back. The
//! [`Resolver`] generates canonical URLs for a project, version, and
//! filename; the [`Unresolver`] decomposes incoming URLs into the same
//! triple. Both are backend-agnostic and receive their configuration and
//! repository at construction time.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::PolicyError;
pub use interfaces::ProjectRepository;
pub use interfaces::RepositoryError;
pub use interfaces::VersionRepository;
pub use interfaces::Visibility;
pub use interfaces::VisibilityPolicy;
pub use runtime::DomainSource;
pub use runtime::InMemoryProjectStore;
pub use runtime::PrivacyLevelPolicy;
pub use runtime::ProjectCatalog;
pub use runtime::ResolveError;
pub use runtime::ResolveOptions;
pub use runtime::Resolver;
pub use runtime::UnresolveError;
pub use runtime::UnresolvedDomain;
pub use runtime::UnresolvedPath;
pub use runtime::UnresolvedUrl;
pub use runtime::Unresolver;
