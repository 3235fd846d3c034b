// crates/docserve-core/src/runtime/canonical.rs
// ============================================================================
// Module: Canonical Project
// Description: Canonical-project and nesting-location computation.
// Purpose: Resolve translation/subproject families to a single owning project.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! A translation defers to its main project and a subproject defers to its
//! superproject; the project reached when neither applies owns the domain and
//! prefix identity of the whole family. Relationship graphs may be
//! inconsistent (self-referential subprojects, translation cycles), so every
//! walk keeps a visited set keyed by [`ProjectId`] and stops at the first
//! repeat. Walks are iterative and always terminate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::DEFAULT_SUBPROJECT_PREFIX;
use crate::core::Project;
use crate::core::ProjectId;
use crate::core::prefix::join_url_path;
use crate::core::prefix::normalize_prefix;
use crate::interfaces::ProjectRepository;
use crate::interfaces::RepositoryError;

// ============================================================================
// SECTION: Canonical Project
// ============================================================================

/// Returns the canonical project owning `project`'s domain identity.
///
/// Follows `main_language_project` first, then the superproject relation.
/// When a project id repeats, the last project visited before the repeat is
/// returned.
///
/// # Errors
///
/// Returns [`RepositoryError`] when a relationship lookup fails.
pub fn canonical_project<R>(repository: &R, project: &Project) -> Result<Project, RepositoryError>
where
    R: ProjectRepository + ?Sized,
{
    let mut visited: BTreeSet<ProjectId> = BTreeSet::new();
    let mut current = project.clone();
    loop {
        visited.insert(current.id);
        let next = match repository.main_language_project(&current)? {
            Some(main) => Some(main),
            None => repository.superproject(&current)?.map(|(parent, _)| parent),
        };
        match next {
            Some(next) if !visited.contains(&next.id) => current = next,
            _ => return Ok(current),
        }
    }
}

// ============================================================================
// SECTION: Project Location
// ============================================================================

/// Where a project's pages live relative to the root of its family.
///
/// # Invariants
/// - `base` is an absolute path ending in `/` (`/` for root projects).
/// - `prefix_owner` is the project whose custom prefix and single-version
///   setting apply: the project itself, or its main project for translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Top of the subproject chain.
    pub root: Project,
    /// Project whose prefix settings apply.
    pub prefix_owner: Project,
    /// Subproject nesting path below the root (e.g. `/projects/sub/`).
    pub base: String,
}

impl ProjectLocation {
    /// Returns true when the project is addressed directly at its root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.base == "/"
    }
}

/// Computes the nesting location of `project`.
///
/// Each subproject level contributes its parent's subproject prefix followed
/// by the relation's alias (or the child's slug). Translations take the
/// position of their main project.
///
/// # Errors
///
/// Returns [`RepositoryError`] when a relationship lookup fails.
pub fn project_location<R>(
    repository: &R,
    project: &Project,
) -> Result<ProjectLocation, RepositoryError>
where
    R: ProjectRepository + ?Sized,
{
    let prefix_owner = match repository.main_language_project(project)? {
        Some(main) if main.id != project.id => main,
        _ => project.clone(),
    };
    let mut visited: BTreeSet<ProjectId> = BTreeSet::from([prefix_owner.id]);
    let mut levels: Vec<String> = Vec::new();
    let mut current = prefix_owner.clone();
    while let Some((parent, relation)) = repository.superproject(&current)? {
        if !visited.insert(parent.id) {
            break;
        }
        let subproject_prefix = normalize_prefix(
            parent.custom_subproject_prefix.as_deref().unwrap_or(DEFAULT_SUBPROJECT_PREFIX),
        );
        levels.push(format!("{subproject_prefix}{}/", relation.path_segment(&current)));
        current = parent;
    }
    levels.reverse();
    let parts: Vec<&str> = levels.iter().map(String::as_str).collect();
    Ok(ProjectLocation {
        root: current,
        prefix_owner,
        base: join_url_path(&parts),
    })
}
