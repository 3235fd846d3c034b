// crates/docserve-core/src/runtime/store.rs
// ============================================================================
// Module: Docserve In-Memory Store
// Description: Deterministic in-memory project repository and catalog format.
// Purpose: Back tests, demos, and the CLI memory backend without a database.
// Dependencies: crate::core, crate::interfaces, serde
// ============================================================================

//! ## Overview
//! [`InMemoryProjectStore`] implements both repository traits over ordered
//! maps, so every listing comes back in a stable order. [`ProjectCatalog`] is
//! the flat, serializable snapshot used to seed stores from JSON files.
//! Clones share the same underlying state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Domain;
use crate::core::Project;
use crate::core::ProjectId;
use crate::core::SubprojectRelation;
use crate::core::Version;
use crate::interfaces::ProjectRepository;
use crate::interfaces::RepositoryError;
use crate::interfaces::VersionRepository;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Flat snapshot of projects and their relationships.
///
/// # Invariants
/// - Record order is irrelevant; stores impose their own ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectCatalog {
    /// Project records.
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Version records.
    #[serde(default)]
    pub versions: Vec<Version>,
    /// Custom domain records.
    #[serde(default)]
    pub domains: Vec<Domain>,
    /// Subproject relations.
    #[serde(default)]
    pub subprojects: Vec<SubprojectRelation>,
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Ordered record maps behind the store mutex.
#[derive(Debug, Default)]
struct StoreState {
    /// Projects keyed by id.
    projects: BTreeMap<ProjectId, Project>,
    /// Versions keyed by project id and slug.
    versions: BTreeMap<(ProjectId, String), Version>,
    /// Domains keyed by lowercase hostname.
    domains: BTreeMap<String, Domain>,
    /// Relations keyed by child id (a project has at most one superproject).
    relations: BTreeMap<ProjectId, SubprojectRelation>,
}

impl StoreState {
    /// Fails when `id` names no stored project.
    fn require_project(&self, id: ProjectId, what: &str) -> Result<(), RepositoryError> {
        if self.projects.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::Invalid(format!("{what} references unknown project {id}")))
        }
    }
}

/// In-memory project repository for tests and local use.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProjectStore {
    /// Record maps protected by a mutex.
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded from a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when a record references an unknown project
    /// or a slug is duplicated.
    pub fn from_catalog(catalog: &ProjectCatalog) -> Result<Self, RepositoryError> {
        let store = Self::new();
        store.import(catalog)?;
        Ok(store)
    }

    /// Inserts every record of a catalog, projects first.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when a record is rejected.
    pub fn import(&self, catalog: &ProjectCatalog) -> Result<(), RepositoryError> {
        for project in &catalog.projects {
            self.insert_project(project.clone())?;
        }
        for version in &catalog.versions {
            self.insert_version(version.clone())?;
        }
        for domain in &catalog.domains {
            self.insert_domain(domain.clone())?;
        }
        for relation in &catalog.subprojects {
            self.add_subproject(relation.clone())?;
        }
        Ok(())
    }

    /// Inserts or replaces a project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] when the slug is not lowercase or
    /// another project owns it.
    pub fn insert_project(&self, project: Project) -> Result<(), RepositoryError> {
        if !project.slug.is_lowercase() {
            return Err(RepositoryError::Invalid(format!(
                "project slug must be lowercase: {}",
                project.slug
            )));
        }
        let mut state = self.lock()?;
        if state.projects.values().any(|other| other.slug == project.slug && other.id != project.id)
        {
            return Err(RepositoryError::Invalid(format!("duplicate project slug: {}", project.slug)));
        }
        state.projects.insert(project.id, project);
        drop(state);
        Ok(())
    }

    /// Inserts or replaces a version.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] when the owning project is unknown.
    pub fn insert_version(&self, version: Version) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state.require_project(version.project_id, "version")?;
        state.versions.insert((version.project_id, version.slug.as_str().to_string()), version);
        drop(state);
        Ok(())
    }

    /// Inserts or replaces a custom domain (hostnames are stored lowercase).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] when the owning project is unknown.
    pub fn insert_domain(&self, mut domain: Domain) -> Result<(), RepositoryError> {
        domain.domain = domain.domain.trim().to_ascii_lowercase();
        let mut state = self.lock()?;
        state.require_project(domain.project_id, "domain")?;
        state.domains.insert(domain.domain.clone(), domain);
        drop(state);
        Ok(())
    }

    /// Nests `relation.child_id` under `relation.parent_id`, replacing any
    /// previous superproject of the child.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Invalid`] when either project is unknown.
    pub fn add_subproject(&self, relation: SubprojectRelation) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        state.require_project(relation.parent_id, "subproject relation")?;
        state.require_project(relation.child_id, "subproject relation")?;
        state.relations.insert(relation.child_id, relation);
        drop(state);
        Ok(())
    }

    /// Returns a catalog snapshot of the stored records.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the store mutex is poisoned.
    pub fn snapshot(&self) -> Result<ProjectCatalog, RepositoryError> {
        let state = self.lock()?;
        Ok(ProjectCatalog {
            projects: state.projects.values().cloned().collect(),
            versions: state.versions.values().cloned().collect(),
            domains: state.domains.values().cloned().collect(),
            subprojects: state.relations.values().cloned().collect(),
        })
    }

    /// Locks the record maps.
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Backend("project store mutex poisoned".to_string()))
    }
}

impl ProjectRepository for InMemoryProjectStore {
    fn project_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(self.lock()?.projects.get(&id).cloned())
    }

    fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, RepositoryError> {
        Ok(self.lock()?.projects.values().find(|project| project.slug.as_str() == slug).cloned())
    }

    fn project_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<(Project, Domain)>, RepositoryError> {
        let state = self.lock()?;
        let Some(domain) = state.domains.get(&hostname.to_ascii_lowercase()) else {
            return Ok(None);
        };
        Ok(state.projects.get(&domain.project_id).map(|project| (project.clone(), domain.clone())))
    }

    fn domains(&self, project: &Project) -> Result<Vec<Domain>, RepositoryError> {
        Ok(self
            .lock()?
            .domains
            .values()
            .filter(|domain| domain.project_id == project.id)
            .cloned()
            .collect())
    }

    fn superproject(
        &self,
        project: &Project,
    ) -> Result<Option<(Project, SubprojectRelation)>, RepositoryError> {
        let state = self.lock()?;
        let Some(relation) = state.relations.get(&project.id) else {
            return Ok(None);
        };
        Ok(state.projects.get(&relation.parent_id).map(|parent| (parent.clone(), relation.clone())))
    }

    fn subprojects(
        &self,
        project: &Project,
    ) -> Result<Vec<(Project, SubprojectRelation)>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .relations
            .values()
            .filter(|relation| relation.parent_id == project.id)
            .filter_map(|relation| {
                state.projects.get(&relation.child_id).map(|child| (child.clone(), relation.clone()))
            })
            .collect())
    }

    fn translations(&self, project: &Project) -> Result<Vec<Project>, RepositoryError> {
        Ok(self
            .lock()?
            .projects
            .values()
            .filter(|other| other.main_language_project == Some(project.id) && other.id != project.id)
            .cloned()
            .collect())
    }
}

impl VersionRepository for InMemoryProjectStore {
    fn version(&self, project: &Project, slug: &str) -> Result<Option<Version>, RepositoryError> {
        Ok(self.lock()?.versions.get(&(project.id, slug.to_string())).cloned())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
