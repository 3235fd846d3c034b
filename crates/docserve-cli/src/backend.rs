// crates/docserve-cli/src/backend.rs
// ============================================================================
// Module: CLI Repository Backends
// Description: Opens the configured project repository for CLI commands.
// Purpose: Select the memory or SQLite store and seed catalogs from JSON.
// Dependencies: docserve-config, docserve-core, docserve-store-sqlite, serde_json
// ============================================================================

//! ## Overview
//! The CLI serves every command from exactly one repository: an in-memory
//! store (optionally seeded from a JSON catalog) or a `SQLite` database.
//! Catalog files are size-limited before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use docserve_config::StoreConfig;
use docserve_config::StoreType;
use docserve_core::InMemoryProjectStore;
use docserve_core::ProjectCatalog;
use docserve_store_sqlite::SqliteProjectStore;
use tracing::debug;
use tracing::info;

use crate::CliError;
use crate::CliResult;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a JSON catalog file.
pub(crate) const MAX_CATALOG_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Backend
// ============================================================================

/// Repository selected by the `[store]` configuration section.
pub(crate) enum Backend {
    /// In-memory store.
    Memory(InMemoryProjectStore),
    /// `SQLite` store.
    Sqlite(SqliteProjectStore),
}

/// Opens the configured repository.
pub(crate) fn open_backend(store: &StoreConfig) -> CliResult<Backend> {
    match store.store_type {
        StoreType::Memory => {
            let repository = match &store.catalog {
                Some(path) => {
                    let catalog = load_catalog(path)?;
                    InMemoryProjectStore::from_catalog(&catalog).map_err(|err| {
                        CliError::new(format!("failed to seed memory store: {err}"))
                    })?
                }
                None => InMemoryProjectStore::new(),
            };
            debug!(backend = "memory", "repository opened");
            Ok(Backend::Memory(repository))
        }
        StoreType::Sqlite => {
            let config = store
                .sqlite_config()
                .ok_or_else(|| CliError::new("sqlite store requires store.path".to_string()))?;
            let path = config.path.display().to_string();
            let repository = SqliteProjectStore::new(config)
                .map_err(|err| CliError::new(format!("failed to open sqlite store: {err}")))?;
            debug!(backend = "sqlite", path = %path, "repository opened");
            Ok(Backend::Sqlite(repository))
        }
    }
}

/// Reads and parses a JSON catalog file.
pub(crate) fn load_catalog(path: &Path) -> CliResult<ProjectCatalog> {
    let bytes = fs::read(path).map_err(|err| {
        CliError::new(format!("failed to read catalog {}: {err}", path.display()))
    })?;
    if bytes.len() > MAX_CATALOG_BYTES {
        return Err(CliError::new(format!(
            "catalog {} exceeds size limit ({} > {MAX_CATALOG_BYTES})",
            path.display(),
            bytes.len()
        )));
    }
    let catalog: ProjectCatalog = serde_json::from_slice(&bytes).map_err(|err| {
        CliError::new(format!("failed to parse catalog {}: {err}", path.display()))
    })?;
    info!(
        path = %path.display(),
        projects = catalog.projects.len(),
        versions = catalog.versions.len(),
        "catalog loaded"
    );
    Ok(catalog)
}
