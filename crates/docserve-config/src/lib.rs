// crates/docserve-config/src/lib.rs
// ============================================================================
// Module: Docserve Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for docserve.toml semantics.
// Dependencies: docserve-core, docserve-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `docserve-config` defines the configuration model for docserve. It loads
//! `docserve.toml`, validates it fail-closed, and converts it into the
//! [`docserve_core::ResolverConfig`] and store settings used at runtime.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
pub use examples::path_based_config_toml_example;
