// crates/docserve-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payloads.
// Purpose: Deterministic starting points for operators and tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `docserve.toml` files. Each example parses and
//! validates against [`crate::DocserveConfig`].

/// Returns an example configuration using subdomains and a `SQLite` store.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[resolver]
public_domain_suffix = "readthedocs.io"
external_domain_suffix = "readthedocs-hosted.build"
production_domain = "readthedocs.org"
public_domain_uses_https = true
use_subdomain = true

[store]
type = "sqlite"
path = "docserve.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000
"#,
    )
}

/// Returns an example configuration serving `/docs/{slug}/` paths from
/// the production domain with an in-memory catalog.
#[must_use]
pub fn path_based_config_toml_example() -> String {
    String::from(
        r#"[resolver]
public_domain_suffix = "docs.internal"
external_domain_suffix = "build.internal"
production_domain = "docs.example.com"
use_subdomain = false

[store]
type = "memory"
catalog = "catalog.json"
"#,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use super::*;
    use crate::DocserveConfig;
    use crate::StoreType;

    #[test]
    fn examples_validate() {
        let sqlite = DocserveConfig::from_toml(&config_toml_example()).unwrap();
        assert_eq!(sqlite.store.store_type, StoreType::Sqlite);
        assert!(sqlite.resolver_config().public_domain_uses_https);

        let memory = DocserveConfig::from_toml(&path_based_config_toml_example()).unwrap();
        assert!(!memory.resolver.use_subdomain);
        assert!(memory.store.catalog.is_some());
    }
}
