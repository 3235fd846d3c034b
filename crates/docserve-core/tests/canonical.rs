// crates/docserve-core/tests/canonical.rs
// ============================================================================
// Module: Canonical Project Tests
// Description: Canonical-project walks and nesting locations.
// Purpose: Ensure family walks pick the owning project and always terminate.
// ============================================================================

//! ## Overview
//! Covers translation and subproject deferral, chained relations, and the
//! visited-set termination rule on self-referential and cyclic graphs.

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

use docserve_core::InMemoryProjectStore;
use docserve_core::Project;
use docserve_core::runtime::canonical_project;
use docserve_core::runtime::project_location;

use crate::common::Family;
use crate::common::project;
use crate::common::relation;

fn slug_of(store: &InMemoryProjectStore, project: &Project) -> String {
    canonical_project(store, project).unwrap().slug.as_str().to_string()
}

#[test]
fn root_project_is_its_own_canonical() {
    let family = Family::new();
    let store = family.store();
    assert_eq!(slug_of(&store, &family.pip), "pip");
}

#[test]
fn translation_defers_to_main_project() {
    let family = Family::new();
    let store = family.store();
    assert_eq!(slug_of(&store, &family.translation), "pip");
}

#[test]
fn subproject_defers_to_superproject() {
    let family = Family::new();
    let store = family.store();
    assert_eq!(slug_of(&store, &family.sub), "pip");
}

#[test]
fn translation_of_subproject_climbs_both_relations() {
    let family = Family::new();
    let store = family.store();
    let sub_en = Project {
        main_language_project: Some(family.sub.id),
        ..project(11, "sub-en", "en")
    };
    store.insert_project(sub_en.clone()).unwrap();
    assert_eq!(slug_of(&store, &sub_en), "pip");
    let location = project_location(&store, &sub_en).unwrap();
    assert_eq!(location.root.slug.as_str(), "pip");
    assert_eq!(location.prefix_owner.slug.as_str(), "sub");
    assert_eq!(location.base, "/projects/sub/");
}

#[test]
fn dangling_main_language_reference_is_ignored() {
    let store = InMemoryProjectStore::new();
    let orphan = Project {
        main_language_project: Some(common::pid(99)),
        ..project(1, "orphan", "fr")
    };
    store.insert_project(orphan.clone()).unwrap();
    assert_eq!(slug_of(&store, &orphan), "orphan");
}

#[test]
fn self_referential_subproject_returns_itself() {
    let store = InMemoryProjectStore::new();
    let looped = project(1, "looped", "en");
    store.insert_project(looped.clone()).unwrap();
    store.add_subproject(relation(&looped, &looped, None)).unwrap();
    assert_eq!(slug_of(&store, &looped), "looped");
    let location = project_location(&store, &looped).unwrap();
    assert!(location.is_root());
}

#[test]
fn self_referential_translation_returns_itself() {
    let store = InMemoryProjectStore::new();
    let looped = Project {
        main_language_project: Some(common::pid(1)),
        ..project(1, "looped", "en")
    };
    store.insert_project(looped.clone()).unwrap();
    let canonical = canonical_project(&store, &looped).unwrap();
    assert_eq!(canonical.slug.as_str(), "looped");
    assert_eq!(canonical_project(&store, &canonical).unwrap(), canonical);
}

#[test]
fn translation_cycle_stops_at_last_visited_project() {
    let store = InMemoryProjectStore::new();
    let first = Project {
        main_language_project: Some(common::pid(2)),
        ..project(1, "first", "en")
    };
    let second = Project {
        main_language_project: Some(common::pid(1)),
        ..project(2, "second", "de")
    };
    store.insert_project(first.clone()).unwrap();
    store.insert_project(second.clone()).unwrap();
    assert_eq!(slug_of(&store, &first), "second");
    assert_eq!(slug_of(&store, &second), "first");
}

#[test]
fn subproject_cycle_terminates() {
    let store = InMemoryProjectStore::new();
    let a = project(1, "a", "en");
    let b = project(2, "b", "en");
    let c = project(3, "c", "en");
    for item in [&a, &b, &c] {
        store.insert_project(item.clone()).unwrap();
    }
    store.add_subproject(relation(&a, &b, None)).unwrap();
    store.add_subproject(relation(&b, &c, None)).unwrap();
    store.add_subproject(relation(&c, &a, None)).unwrap();
    assert_eq!(slug_of(&store, &a), "b");
    let location = project_location(&store, &a).unwrap();
    assert_eq!(location.root.slug.as_str(), "b");
    assert_eq!(location.base, "/projects/c/projects/a/");
}

#[test]
fn canonical_is_idempotent_on_acyclic_family() {
    let family = Family::new();
    let store = family.store();
    for member in [&family.pip, &family.sub, &family.translation] {
        let once = canonical_project(&store, member).unwrap();
        let twice = canonical_project(&store, &once).unwrap();
        assert_eq!(once, twice);
    }
}
