// crates/docserve-core/src/interfaces/mod.rs
// ============================================================================
// Module: Docserve Interfaces
// Description: Backend-agnostic collaborator interfaces for URL resolution.
// Purpose: Define the repository and visibility contracts injected into resolvers.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The resolver and unresolver never reach into a database or global settings.
//! Everything they need is fetched through the traits defined here, which are
//! injected at construction time. Implementations must be side-effect free
//! from the caller's perspective and safe for concurrent reads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::Domain;
use crate::core::Project;
use crate::core::ProjectId;
use crate::core::SubprojectRelation;
use crate::core::Version;
use crate::core::VersionKind;
use crate::core::VersionSlug;

// ============================================================================
// SECTION: Repository Errors
// ============================================================================

/// Repository errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - A missing record is never an error; lookups return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Repository I/O error.
    #[error("repository io error: {0}")]
    Io(String),
    /// Backend reported an error.
    #[error("repository backend error: {0}")]
    Backend(String),
    /// Stored data is corrupt.
    #[error("repository corruption: {0}")]
    Corrupt(String),
    /// Stored data is invalid.
    #[error("repository invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Project Repository
// ============================================================================

/// Read access to projects and their relationships.
pub trait ProjectRepository {
    /// Fetches a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn project_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError>;

    /// Fetches a project by slug.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, RepositoryError>;

    /// Fetches the project owning a custom domain, along with the domain record.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn project_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<(Project, Domain)>, RepositoryError>;

    /// Lists the custom domains of a project in stable order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn domains(&self, project: &Project) -> Result<Vec<Domain>, RepositoryError>;

    /// Returns the superproject of `project` and the relation linking them.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn superproject(
        &self,
        project: &Project,
    ) -> Result<Option<(Project, SubprojectRelation)>, RepositoryError>;

    /// Lists the subprojects of `project` in stable order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn subprojects(
        &self,
        project: &Project,
    ) -> Result<Vec<(Project, SubprojectRelation)>, RepositoryError>;

    /// Lists the translations whose main project is `project`, in stable order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn translations(&self, project: &Project) -> Result<Vec<Project>, RepositoryError>;

    /// Returns the authoritative custom domain of `project`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn canonical_domain(&self, project: &Project) -> Result<Option<Domain>, RepositoryError> {
        Ok(self.domains(project)?.into_iter().find(|domain| domain.canonical))
    }

    /// Returns the main project of a translation.
    ///
    /// Dangling references resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn main_language_project(&self, project: &Project) -> Result<Option<Project>, RepositoryError> {
        match project.main_language_project {
            Some(id) => self.project_by_id(id),
            None => Ok(None),
        }
    }

    /// Returns the slug of the version served when none is requested.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn default_version_slug(&self, project: &Project) -> Result<VersionSlug, RepositoryError> {
        Ok(project.default_version.clone().unwrap_or_else(VersionSlug::latest))
    }
}

// ============================================================================
// SECTION: Version Repository
// ============================================================================

/// Read access to project versions.
pub trait VersionRepository {
    /// Fetches a version of `project` by slug.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn version(&self, project: &Project, slug: &str) -> Result<Option<Version>, RepositoryError>;

    /// Returns true when the version exists and has the required kind.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when the backend fails.
    fn version_exists_and_matches_type(
        &self,
        project: &Project,
        slug: &str,
        required: VersionKind,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .version(project, slug)?
            .is_some_and(|version| version.version_type.kind() == required))
    }
}

// ============================================================================
// SECTION: Shared Implementations
// ============================================================================

/// Forwards every project lookup to the wrapped repository.
macro_rules! forward_project_repository {
    ($ty:ty) => {
        impl<T: ProjectRepository + ?Sized> ProjectRepository for $ty {
            fn project_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
                (**self).project_by_id(id)
            }

            fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, RepositoryError> {
                (**self).project_by_slug(slug)
            }

            fn project_by_domain(
                &self,
                hostname: &str,
            ) -> Result<Option<(Project, Domain)>, RepositoryError> {
                (**self).project_by_domain(hostname)
            }

            fn domains(&self, project: &Project) -> Result<Vec<Domain>, RepositoryError> {
                (**self).domains(project)
            }

            fn superproject(
                &self,
                project: &Project,
            ) -> Result<Option<(Project, SubprojectRelation)>, RepositoryError> {
                (**self).superproject(project)
            }

            fn subprojects(
                &self,
                project: &Project,
            ) -> Result<Vec<(Project, SubprojectRelation)>, RepositoryError> {
                (**self).subprojects(project)
            }

            fn translations(&self, project: &Project) -> Result<Vec<Project>, RepositoryError> {
                (**self).translations(project)
            }

            fn canonical_domain(
                &self,
                project: &Project,
            ) -> Result<Option<Domain>, RepositoryError> {
                (**self).canonical_domain(project)
            }

            fn main_language_project(
                &self,
                project: &Project,
            ) -> Result<Option<Project>, RepositoryError> {
                (**self).main_language_project(project)
            }

            fn default_version_slug(
                &self,
                project: &Project,
            ) -> Result<VersionSlug, RepositoryError> {
                (**self).default_version_slug(project)
            }
        }

        impl<T: VersionRepository + ?Sized> VersionRepository for $ty {
            fn version(
                &self,
                project: &Project,
                slug: &str,
            ) -> Result<Option<Version>, RepositoryError> {
                (**self).version(project, slug)
            }

            fn version_exists_and_matches_type(
                &self,
                project: &Project,
                slug: &str,
                required: VersionKind,
            ) -> Result<bool, RepositoryError> {
                (**self).version_exists_and_matches_type(project, slug, required)
            }
        }
    };
}

forward_project_repository!(&T);
forward_project_repository!(Arc<T>);

// ============================================================================
// SECTION: Visibility Policy
// ============================================================================

/// Visibility policy errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Policy evaluation failed.
    #[error("visibility policy error: {0}")]
    Evaluation(String),
}

/// Outcome of a visibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The current viewer may see the documentation.
    Visible,
    /// The documentation must be reported as not found.
    Hidden,
}

/// Request-level visibility decision for resolved documentation.
///
/// The unresolver never consults this; callers hand its output to a policy.
pub trait VisibilityPolicy {
    /// Decides whether the current viewer may see `project` (and `version`).
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when the decision cannot be made.
    fn decide(
        &self,
        project: &Project,
        version: Option<&Version>,
    ) -> Result<Visibility, PolicyError>;
}
