// crates/docserve-config/src/config.rs
// ============================================================================
// Module: Docserve Configuration
// Description: Configuration loading and validation for docserve.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: docserve-core, docserve-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The `[resolver]` section carries the hostnames URLs are built from and is
//! required; the `[store]` section selects the repository backend and
//! defaults to an empty in-memory store. Unknown keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use docserve_core::ResolverConfig;
use docserve_store_sqlite::SqliteStoreConfig;
use docserve_store_sqlite::SqliteStoreMode;
use docserve_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "docserve.toml";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "DOCSERVE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum hostname length (RFC 1035).
pub(crate) const MAX_HOSTNAME_LENGTH: usize = 253;
/// Maximum hostname label length.
pub(crate) const MAX_LABEL_LENGTH: usize = 63;
/// Default `SQLite` busy timeout (ms).
pub(crate) const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum `SQLite` busy timeout (ms).
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file is not valid TOML for the model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Configuration violates a validation rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Docserve configuration root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocserveConfig {
    /// Hostnames and serving mode.
    pub resolver: ResolverSection,
    /// Repository backend selection.
    #[serde(default)]
    pub store: StoreConfig,
}

impl DocserveConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is taken from `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()?;
        self.store.validate()
    }

    /// Returns the resolver configuration consumed by the core crate.
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        self.resolver.to_resolver_config()
    }
}

/// `[resolver]` section.
///
/// # Invariants
/// - Every hostname is lowercase with no scheme, port, path or edge dots.
/// - `public_domain_suffix` and `external_domain_suffix` differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Suffix of public project subdomains.
    pub public_domain_suffix: String,
    /// Suffix of external-version subdomains.
    pub external_domain_suffix: String,
    /// Production hostname used in path-based mode.
    pub production_domain: String,
    /// Generate https URLs for public and external hosts.
    #[serde(default)]
    pub public_domain_uses_https: bool,
    /// Serve projects from subdomains.
    #[serde(default = "default_use_subdomain")]
    pub use_subdomain: bool,
}

impl ResolverSection {
    /// Validates hostnames and their relationships.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_hostname("resolver.public_domain_suffix", &self.public_domain_suffix)?;
        validate_hostname("resolver.external_domain_suffix", &self.external_domain_suffix)?;
        validate_hostname("resolver.production_domain", &self.production_domain)?;
        if self.public_domain_suffix == self.external_domain_suffix {
            return Err(ConfigError::Invalid(
                "resolver.public_domain_suffix and resolver.external_domain_suffix must differ"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Converts the section into a core [`ResolverConfig`].
    #[must_use]
    pub fn to_resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            public_domain_suffix: self.public_domain_suffix.clone(),
            external_domain_suffix: self.external_domain_suffix.clone(),
            production_domain: self.production_domain.clone(),
            public_domain_uses_https: self.public_domain_uses_https,
            use_subdomain: self.use_subdomain,
        }
    }
}

/// Returns the default serving mode.
const fn default_use_subdomain() -> bool {
    true
}

/// Repository backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory store, optionally seeded from a JSON catalog.
    #[default]
    Memory,
    /// `SQLite`-backed store.
    Sqlite,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Backend kind.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Database path (sqlite only).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// JSON catalog seeding the memory store.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Busy timeout in milliseconds (sqlite only).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Memory,
            path: None,
            catalog: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates backend-specific fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when fields do not fit the backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set store.path".to_string(),
                    ));
                }
                if let Some(catalog) = &self.catalog {
                    validate_path_string("store.catalog", &catalog.to_string_lossy())?;
                }
            }
            StoreType::Sqlite => {
                let Some(path) = &self.path else {
                    return Err(ConfigError::Invalid("sqlite store requires store.path".to_string()));
                };
                validate_path_string("store.path", &path.to_string_lossy())?;
                if self.catalog.is_some() {
                    return Err(ConfigError::Invalid(
                        "sqlite store must not set store.catalog; use the import command"
                            .to_string(),
                    ));
                }
                if self.busy_timeout_ms == 0 || self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
                    return Err(ConfigError::Invalid(format!(
                        "store.busy_timeout_ms must be between 1 and {MAX_BUSY_TIMEOUT_MS}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns the `SQLite` store configuration when the sqlite backend is
    /// selected.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Resolves the config path from the argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a bare lowercase hostname.
fn validate_hostname(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_HOSTNAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if value.contains("://") {
        return Err(ConfigError::Invalid(format!("{field} must not include a scheme")));
    }
    if value.contains(':') {
        return Err(ConfigError::Invalid(format!("{field} must not include a port")));
    }
    if value.contains('/') {
        return Err(ConfigError::Invalid(format!("{field} must not include a path")));
    }
    if value.starts_with('.') || value.ends_with('.') {
        return Err(ConfigError::Invalid(format!("{field} must not start or end with a dot")));
    }
    if value.chars().any(|ch| ch.is_ascii_uppercase()) {
        return Err(ConfigError::Invalid(format!("{field} must be lowercase")));
    }
    for label in value.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} has an invalid label")));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ConfigError::Invalid(format!(
                "{field} labels must not start or end with a hyphen"
            )));
        }
        if !label.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-') {
            return Err(ConfigError::Invalid(format!("{field} contains invalid characters")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::*;

    #[test]
    fn hostname_rules() {
        assert!(validate_hostname("f", "readthedocs.io").is_ok());
        assert!(validate_hostname("f", "docs-1.example.com").is_ok());
        assert!(validate_hostname("f", "localhost").is_ok());
        for bad in [
            "",
            "https://readthedocs.io",
            "readthedocs.io:8000",
            "readthedocs.io/docs",
            ".readthedocs.io",
            "readthedocs.io.",
            "ReadTheDocs.io",
            "read..thedocs.io",
            "-bad.io",
            "under_score.io",
        ] {
            assert!(validate_hostname("f", bad).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn sqlite_config_only_for_sqlite_backend() {
        let memory = StoreConfig::default();
        assert!(memory.sqlite_config().is_none());
        let sqlite = StoreConfig {
            store_type: StoreType::Sqlite,
            path: Some(PathBuf::from("docserve.db")),
            busy_timeout_ms: 250,
            ..StoreConfig::default()
        };
        let converted = sqlite.sqlite_config().unwrap();
        assert_eq!(converted.path, PathBuf::from("docserve.db"));
        assert_eq!(converted.busy_timeout_ms, 250);
    }

    #[test]
    fn explicit_path_wins_over_default() {
        let resolved = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert_eq!(resolved, PathBuf::from("custom.toml"));
    }

    #[test]
    fn overlong_component_is_rejected() {
        let long = "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1);
        assert!(validate_path(Path::new(&long)).is_err());
        assert!(validate_path_string("store.path", "  ").is_err());
    }
}
