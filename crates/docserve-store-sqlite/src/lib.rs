// crates/docserve-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Project Store
// Description: Durable project/version repository backed by SQLite.
// Purpose: Persist the project catalog consumed by the resolver.
// Dependencies: docserve-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed implementation of the
//! [`docserve_core::ProjectRepository`] and [`docserve_core::VersionRepository`]
//! interfaces. Catalogs are imported transactionally and read back with
//! validation, so corrupt rows surface as repository errors rather than
//! wrong URLs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::ImportSummary;
pub use store::SqliteProjectStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
