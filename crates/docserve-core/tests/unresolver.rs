// crates/docserve-core/tests/unresolver.rs
// ============================================================================
// Module: Unresolver Tests
// Description: URL decomposition, partial results, and failure states.
// Purpose: Pin host matching, prefix stripping, and version extraction rules.
// ============================================================================

//! ## Overview
//! Each test drives one transition of the unresolver state machine: host
//! resolution, prefix stripping (including overlapping prefixes),
//! subproject and translation retargeting, version extraction, and filename
//! extraction.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use docserve_core::DomainSource;
use docserve_core::ResolveOptions;
use docserve_core::Resolver;
use docserve_core::UnresolveError;
use docserve_core::UnresolvedUrl;
use docserve_core::Unresolver;

use crate::common::Family;
use crate::common::config;
use crate::common::path_based_config;

fn version_slug(result: &UnresolvedUrl) -> Option<&str> {
    result.version.as_ref().map(|version| version.slug.as_str())
}

// ============================================================================
// SECTION: Public Subdomains
// ============================================================================

#[test]
fn unresolves_root_of_default_version() {
    let family = Family::new();
    let result = family.unresolver().unresolve("http://pip.readthedocs.org/en/latest/", true).unwrap();
    assert_eq!(result.parent_project, family.pip);
    assert_eq!(result.project, family.pip);
    assert_eq!(version_slug(&result), Some("latest"));
    assert_eq!(result.filename.as_deref(), Some("/index.html"));
    assert_eq!(result.domain.source, DomainSource::PublicDomain);
    assert!(result.is_complete());
}

#[test]
fn append_indexhtml_is_optional() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let bare = unresolver.unresolve("http://pip.readthedocs.org/en/latest/api/", false).unwrap();
    assert_eq!(bare.filename.as_deref(), Some("/api/"));
    let file = unresolver.unresolve("http://pip.readthedocs.org/en/latest/api/", true).unwrap();
    assert_eq!(file.filename.as_deref(), Some("/api/index.html"));
}

#[test]
fn query_and_fragment_are_preserved() {
    let family = Family::new();
    let result = family
        .unresolver()
        .unresolve("http://pip.readthedocs.org/en/stable/usage.html?highlight=x#install", true)
        .unwrap();
    assert_eq!(version_slug(&result), Some("stable"));
    assert_eq!(result.filename.as_deref(), Some("/usage.html"));
    assert_eq!(result.url.query(), Some("highlight=x"));
    assert_eq!(result.url.fragment(), Some("install"));
}

#[test]
fn host_case_port_and_repeated_slashes_are_normalized() {
    let family = Family::new();
    let result = family
        .unresolver()
        .unresolve("http://PIP.ReadTheDocs.org:8000//en//latest//api.html", true)
        .unwrap();
    assert_eq!(result.domain.source_domain, "pip.readthedocs.org");
    assert_eq!(result.filename.as_deref(), Some("/api.html"));
}

#[test]
fn unknown_host_is_a_total_failure() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let err = unresolver.unresolve("http://nope.readthedocs.org/en/latest/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::UnknownHost(_)));
    let err = unresolver.unresolve("http://example.com/en/latest/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::UnknownHost(_)));
    let err = unresolver.unresolve("http://readthedocs.org/docs/pip/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::UnknownHost(_)));
}

#[test]
fn invalid_urls_are_rejected() {
    let family = Family::new();
    let unresolver = family.unresolver();
    assert!(matches!(
        unresolver.unresolve("not a url", true).unwrap_err(),
        UnresolveError::InvalidUrl(_)
    ));
    assert!(matches!(
        unresolver.unresolve("ftp://pip.readthedocs.org/en/latest/", true).unwrap_err(),
        UnresolveError::InvalidUrl(_)
    ));
}

// ============================================================================
// SECTION: Partial Results
// ============================================================================

#[test]
fn unknown_version_is_partial() {
    let family = Family::new();
    let result = family.unresolver().unresolve("http://pip.readthedocs.org/en/nope/", true).unwrap();
    assert_eq!(result.project, family.pip);
    assert!(result.version.is_none());
    assert!(result.filename.is_none());
    assert!(!result.is_complete());
}

#[test]
fn unknown_language_code_is_partial() {
    let family = Family::new();
    let result = family.unresolver().unresolve("http://pip.readthedocs.org/de/latest/", true).unwrap();
    assert_eq!(result.project, family.pip);
    assert!(result.version.is_none());
}

#[test]
fn bare_root_of_multi_version_project_is_partial() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let root = unresolver.unresolve("http://pip.readthedocs.org/", true).unwrap();
    assert_eq!(root.project, family.pip);
    assert!(root.version.is_none());
    let language_only = unresolver.unresolve("http://pip.readthedocs.org/en/", true).unwrap();
    assert!(language_only.version.is_none());
}

#[test]
fn unrecognized_segment_is_not_found() {
    let family = Family::new();
    let err = family
        .unresolver()
        .unresolve("http://pip.readthedocs.org/downloads/latest/", true)
        .unwrap_err();
    assert!(matches!(err, UnresolveError::PathNotFound(_)));
}

#[test]
fn external_version_on_public_host_is_partial() {
    let family = Family::new();
    let result = family.unresolver().unresolve("http://pip.readthedocs.org/en/10/", true).unwrap();
    assert_eq!(result.project, family.pip);
    assert!(result.version.is_none());
}

// ============================================================================
// SECTION: Subprojects and Translations
// ============================================================================

#[test]
fn subproject_url_retargets_to_child() {
    let family = Family::new();
    let result = family
        .unresolver()
        .unresolve("http://pip.readthedocs.org/projects/sub/ja/latest/", true)
        .unwrap();
    assert_eq!(result.parent_project, family.pip);
    assert_eq!(result.project, family.sub);
    assert_eq!(version_slug(&result), Some("latest"));
    assert_eq!(result.filename.as_deref(), Some("/index.html"));
}

#[test]
fn subproject_alias_is_matched_instead_of_slug() {
    let mut family = Family::new();
    family.alias = Some("sub-alias".to_string());
    let unresolver = family.unresolver();
    let result = unresolver
        .unresolve("http://pip.readthedocs.org/projects/sub-alias/ja/latest/", true)
        .unwrap();
    assert_eq!(result.project, family.sub);
    let err = unresolver
        .unresolve("http://pip.readthedocs.org/projects/sub/ja/latest/", true)
        .unwrap_err();
    assert!(matches!(err, UnresolveError::PathNotFound(_)));
}

#[test]
fn translation_url_retargets_to_sibling() {
    let family = Family::new();
    let result = family
        .unresolver()
        .unresolve("http://pip.readthedocs.org/ja/latest/guide.html", true)
        .unwrap();
    assert_eq!(result.parent_project, family.pip);
    assert_eq!(result.project, family.translation);
    assert_eq!(result.filename.as_deref(), Some("/guide.html"));
}

// ============================================================================
// SECTION: Prefixes
// ============================================================================

#[test]
fn custom_prefix_is_required() {
    let mut family = Family::new();
    family.pip.custom_prefix = Some("/custom/prefix/".to_string());
    let unresolver = family.unresolver();
    let result = unresolver
        .unresolve("http://pip.readthedocs.org/custom/prefix/en/latest/", true)
        .unwrap();
    assert_eq!(version_slug(&result), Some("latest"));
    let err = unresolver.unresolve("http://pip.readthedocs.org/en/latest/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::PathNotFound(_)));
}

#[test]
fn valid_overlapping_prefixes_resolve_both_projects() {
    let mut family = Family::new();
    family.pip.custom_prefix = Some("/prefix/".to_string());
    family.pip.custom_subproject_prefix = Some("/prefix/s/".to_string());
    let unresolver = family.unresolver();
    let sub = unresolver
        .unresolve("http://pip.readthedocs.org/prefix/s/sub/ja/latest/", true)
        .unwrap();
    assert_eq!(sub.project, family.sub);
    let main = unresolver.unresolve("http://pip.readthedocs.org/prefix/en/latest/", true).unwrap();
    assert_eq!(main.project, family.pip);
    assert_eq!(version_slug(&main), Some("latest"));
}

#[test]
fn invalid_overlapping_prefixes_fail_for_subproject() {
    let mut family = Family::new();
    family.pip.custom_prefix = Some("/prefix/".to_string());
    family.pip.custom_subproject_prefix = Some("/prefix/es/".to_string());
    let unresolver = family.unresolver();
    let err = unresolver
        .unresolve("http://pip.readthedocs.org/prefix/es/sub/ja/latest/", true)
        .unwrap_err();
    assert!(matches!(err, UnresolveError::PrefixOverlap(_)));
    let main = unresolver.unresolve("http://pip.readthedocs.org/prefix/en/latest/", true).unwrap();
    assert_eq!(main.project, family.pip);
}

#[test]
fn subproject_with_own_prefix_round_trips() {
    let mut family = Family::new();
    family.sub.custom_prefix = Some("/sub-prefix/".to_string());
    let result = family
        .unresolver()
        .unresolve("http://pip.readthedocs.org/projects/sub/sub-prefix/ja/latest/", true)
        .unwrap();
    assert_eq!(result.project, family.sub);
}

// ============================================================================
// SECTION: Single Version
// ============================================================================

#[test]
fn single_version_root_yields_default_version() {
    let mut family = Family::new();
    family.pip.single_version = true;
    let result = family.unresolver().unresolve("http://pip.readthedocs.org/", true).unwrap();
    assert_eq!(version_slug(&result), Some("latest"));
    assert_eq!(result.filename.as_deref(), Some("/index.html"));
    let page = family
        .unresolver()
        .unresolve("http://pip.readthedocs.org/en/latest/page.html", true)
        .unwrap();
    assert_eq!(page.filename.as_deref(), Some("/en/latest/page.html"));
}

// ============================================================================
// SECTION: Custom and Production Domains
// ============================================================================

#[test]
fn custom_domain_matches_before_subdomains() {
    let mut family = Family::new();
    family.domain = Some("docs.pip.io".to_string());
    let result = family.unresolver().unresolve("https://docs.pip.io/ja/latest/", true).unwrap();
    assert_eq!(result.domain.source, DomainSource::CustomDomain);
    assert_eq!(result.domain.domain.as_ref().unwrap().domain, "docs.pip.io");
    assert_eq!(result.project, family.translation);
}

#[test]
fn path_based_urls_unresolve_from_production_domain() {
    let family = Family::new();
    let unresolver = Unresolver::new(path_based_config(), family.store());
    let result = unresolver
        .unresolve("http://readthedocs.org/docs/pip/projects/sub/ja/latest/a.html", true)
        .unwrap();
    assert_eq!(result.domain.source, DomainSource::ProductionDomain);
    assert_eq!(result.parent_project, family.pip);
    assert_eq!(result.project, family.sub);
    assert_eq!(result.filename.as_deref(), Some("/a.html"));
    let err = unresolver.unresolve("http://readthedocs.org/other/pip/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::PathNotFound(_)));
}

// ============================================================================
// SECTION: External Versions
// ============================================================================

#[test]
fn external_host_serves_its_version() {
    let family = Family::new();
    let result = family.unresolver().unresolve("https://pip--10.readthedocs.build/en/10/", true).unwrap();
    assert_eq!(result.domain.source, DomainSource::ExternalDomain);
    assert_eq!(result.domain.external_version_slug.as_deref(), Some("10"));
    assert_eq!(version_slug(&result), Some("10"));
    assert_eq!(result.filename.as_deref(), Some("/index.html"));
}

#[test]
fn external_host_rejects_mismatched_path_version() {
    let family = Family::new();
    let result = family
        .unresolver()
        .unresolve("https://pip--10.readthedocs.build/en/latest/", true)
        .unwrap();
    assert_eq!(result.project, family.pip);
    assert!(result.version.is_none());
}

#[test]
fn external_host_requires_external_version() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let internal = unresolver
        .unresolve("https://pip--latest.readthedocs.build/en/latest/", true)
        .unwrap();
    assert!(internal.version.is_none());
    let missing = unresolver.unresolve("https://pip--11.readthedocs.build/en/11/", true).unwrap();
    assert!(missing.version.is_none());
}

#[test]
fn malformed_external_host_identifies_nothing() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let err = unresolver.unresolve("https://pip-10.readthedocs.build/en/10/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::InvalidExternalHost(_)));
    let err = unresolver.unresolve("https://nope--10.readthedocs.build/en/10/", true).unwrap_err();
    assert!(matches!(err, UnresolveError::UnknownHost(_)));
}

// ============================================================================
// SECTION: Round Trips
// ============================================================================

#[test]
fn resolver_output_unresolves_for_every_family_member() {
    let mut family = Family::new();
    family.alias = Some("docs".to_string());
    family.pip.custom_prefix = Some("/prefix/".to_string());
    let store = family.store();
    let resolver = Resolver::new(config(), store.clone());
    let unresolver = Unresolver::new(config(), store);
    for member in [&family.pip, &family.sub, &family.translation] {
        let url = resolver
            .resolve(member, &ResolveOptions::new().with_filename("guide/index.html"))
            .unwrap();
        let result = unresolver.unresolve(&url, true).unwrap();
        assert_eq!(&result.project, member, "{url}");
        assert_eq!(result.filename.as_deref(), Some("/guide/index.html"));
    }
}

#[test]
fn encoded_filenames_round_trip_in_decoded_form() {
    let family = Family::new();
    let store = family.store();
    let resolver = Resolver::new(config(), store.clone());
    let unresolver = Unresolver::new(config(), store);
    for filename in ["guide/café.html", "a b.html", "100%/#draft?.html", "日本語/"] {
        let url = resolver.resolve(&family.pip, &ResolveOptions::new().with_filename(filename)).unwrap();
        let result = unresolver.unresolve(&url, false).unwrap();
        assert_eq!(result.filename, Some(format!("/{filename}")), "{url}");
    }
}

#[test]
fn encoded_version_segment_is_decoded_before_lookup() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let result = unresolver.unresolve("http://pip.readthedocs.org/en/lat%65st/a%20b.html", true).unwrap();
    assert_eq!(version_slug(&result), Some("latest"));
    assert_eq!(result.filename.as_deref(), Some("/a b.html"));
}

#[test]
fn repeated_calls_are_identical() {
    let family = Family::new();
    let unresolver = family.unresolver();
    let url = "http://pip.readthedocs.org/projects/sub/ja/latest/x.html";
    let first = unresolver.unresolve(url, true).unwrap();
    let second = unresolver.unresolve(url, true).unwrap();
    assert_eq!(first, second);
}
