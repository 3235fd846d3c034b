// crates/docserve-core/src/runtime/resolver.rs
// ============================================================================
// Module: Docserve Resolver
// Description: Project/version/filename to URL generation.
// Purpose: Produce canonical, directly fetchable documentation URLs.
// Dependencies: crate::{core, interfaces}, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! The resolver turns a project (plus optional version, language, and
//! filename) into a URL. It accounts for every addressing mode: canonical
//! custom domains, public subdomains, path-based serving from the production
//! domain, external-version preview hosts, custom prefixes, subproject
//! nesting, and translations.
//!
//! The resolver has no "not found" state. Missing optional data (no custom
//! domain, no alias, no default version) falls back to computed defaults.
//! Errors come from repository failures and from hosts that do not form a
//! valid URL. Paths and queries are percent-encoded on output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use tracing::trace;
use url::Url;

use crate::core::Domain;
use crate::core::EXTERNAL_VERSION_SEPARATOR;
use crate::core::PATH_BASED_ROOT;
use crate::core::Project;
use crate::core::ResolverConfig;
use crate::core::Version;
use crate::core::VersionKind;
use crate::core::VersionSlug;
use crate::core::prefix::encode_path;
use crate::core::prefix::join_url_path;
use crate::interfaces::ProjectRepository;
use crate::interfaces::RepositoryError;
use crate::interfaces::VersionRepository;
use crate::runtime::canonical::canonical_project;
use crate::runtime::canonical::project_location;
use crate::runtime::path::PathParts;
use crate::runtime::path::compose_path;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Resolver errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A repository lookup failed.
    #[error("resolve failed: {0}")]
    Repository(#[from] RepositoryError),
    /// The scheme and host do not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Caller overrides for a single resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Version to address (defaults to the project's default version).
    pub version_slug: Option<VersionSlug>,
    /// Language segment override (defaults to the project's language).
    pub language: Option<String>,
    /// Filename relative to the version root.
    pub filename: String,
    /// Single-version override (defaults to the project setting).
    pub single_version: Option<bool>,
    /// Prefer the canonical custom domain when one exists.
    pub use_canonical_domain: bool,
    /// Force the https scheme.
    pub require_https: bool,
    /// Query string appended to the URL (without the leading `?`).
    pub query: Option<String>,
    /// Treat the version as external (looked up when `None`).
    pub external: Option<bool>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            version_slug: None,
            language: None,
            filename: String::new(),
            single_version: None,
            use_canonical_domain: true,
            require_https: false,
            query: None,
            external: None,
        }
    }
}

impl ResolveOptions {
    /// Creates default options (default version, project language, root page).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses a specific version.
    #[must_use]
    pub fn with_version(mut self, version_slug: impl Into<VersionSlug>) -> Self {
        self.version_slug = Some(version_slug.into());
        self
    }

    /// Overrides the language segment.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Addresses a page below the version root.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Overrides the project's single-version setting.
    #[must_use]
    pub const fn with_single_version(mut self, single_version: bool) -> Self {
        self.single_version = Some(single_version);
        self
    }

    /// Ignores canonical custom domains.
    #[must_use]
    pub const fn without_canonical_domain(mut self) -> Self {
        self.use_canonical_domain = false;
        self
    }

    /// Forces the https scheme.
    #[must_use]
    pub const fn with_https(mut self) -> Self {
        self.require_https = true;
        self
    }

    /// Appends a query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Declares whether the version is external instead of looking it up.
    #[must_use]
    pub const fn with_external(mut self, external: bool) -> Self {
        self.external = Some(external);
        self
    }
}

// ============================================================================
// SECTION: Serving Mode
// ============================================================================

/// Host family a URL is generated for.
#[derive(Debug, Clone)]
enum Serving {
    /// Canonical custom domain of the canonical project.
    CustomDomain(Domain),
    /// `{slug}.{public_domain_suffix}` of the canonical project.
    PublicSubdomain(Project),
    /// `production_domain` with `/docs/{slug}/` paths.
    ProductionDomain,
    /// `{slug}--{version}.{external_domain_suffix}`.
    External,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Generates documentation URLs from project snapshots.
///
/// # Invariants
/// - Stateless apart from the injected configuration and repository.
/// - Deterministic for a fixed repository snapshot.
#[derive(Debug, Clone)]
pub struct Resolver<R> {
    /// Addressing configuration.
    config: ResolverConfig,
    /// Project and version lookups.
    repository: R,
}

impl<R> Resolver<R>
where
    R: ProjectRepository + VersionRepository,
{
    /// Creates a resolver over the given configuration and repository.
    #[must_use]
    pub const fn new(config: ResolverConfig, repository: R) -> Self {
        Self {
            config,
            repository,
        }
    }

    /// Returns the addressing configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the canonical project owning `project`'s domain identity.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a repository lookup fails.
    pub fn canonical_project(&self, project: &Project) -> Result<Project, ResolveError> {
        Ok(canonical_project(&self.repository, project)?)
    }

    /// Returns the hostname serving `project`'s internal versions.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a repository lookup fails.
    pub fn resolve_domain(
        &self,
        project: &Project,
        use_canonical_domain: bool,
    ) -> Result<String, ResolveError> {
        let canonical = canonical_project(&self.repository, project)?;
        if use_canonical_domain && let Some(domain) = self.repository.canonical_domain(&canonical)? {
            return Ok(domain.domain);
        }
        Ok(self.public_host(&canonical))
    }

    /// Returns the preview hostname of an external version of `project`.
    #[must_use]
    pub fn resolve_external_domain(&self, project: &Project, version_slug: &VersionSlug) -> String {
        format!(
            "{}{EXTERNAL_VERSION_SEPARATOR}{}.{}",
            project.slug, version_slug, self.config.external_domain_suffix
        )
    }

    /// Returns the path portion of the URL for `project`, before percent-encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a repository lookup fails.
    pub fn resolve_path(
        &self,
        project: &Project,
        options: &ResolveOptions,
    ) -> Result<String, ResolveError> {
        let version_slug = self.version_slug(project, options)?;
        let serving = self.serving(project, &version_slug, options)?;
        self.build_path(project, &version_slug, options, &serving)
    }

    /// Returns the full URL (scheme, host, path, query) for `project`.
    ///
    /// Path segments and the query are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a repository lookup fails or the host is
    /// not a valid URL host.
    pub fn resolve(&self, project: &Project, options: &ResolveOptions) -> Result<String, ResolveError> {
        let version_slug = self.version_slug(project, options)?;
        let serving = self.serving(project, &version_slug, options)?;
        let (https, host) = match &serving {
            Serving::CustomDomain(domain) => (domain.https, domain.domain.clone()),
            Serving::PublicSubdomain(canonical) => {
                (self.config.public_domain_uses_https, self.public_host(canonical))
            }
            Serving::ProductionDomain => {
                (self.config.public_domain_uses_https, self.config.production_domain.clone())
            }
            Serving::External => (
                self.config.public_domain_uses_https,
                self.resolve_external_domain(project, &version_slug),
            ),
        };
        let scheme = if https || options.require_https { "https" } else { "http" };
        let path = self.build_path(project, &version_slug, options, &serving)?;
        let origin = format!("{scheme}://{host}");
        let mut url = Url::parse(&origin)
            .map_err(|err| ResolveError::InvalidUrl(format!("{origin}: {err}")))?;
        url.set_path(&encode_path(&path));
        if let Some(query) = options.query.as_deref().map(|query| query.trim_start_matches('?'))
            && !query.is_empty()
        {
            url.set_query(Some(query));
        }
        let url = String::from(url);
        trace!(project = %project.slug, version = %version_slug, url = %url, "resolved url");
        Ok(url)
    }

    /// Resolves a concrete version, routing external versions to their preview host.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a repository lookup fails.
    pub fn resolve_version(
        &self,
        project: &Project,
        version: &Version,
        filename: &str,
    ) -> Result<String, ResolveError> {
        let options = ResolveOptions::new()
            .with_version(version.slug.clone())
            .with_filename(filename)
            .with_external(version.is_external());
        self.resolve(project, &options)
    }

    /// Returns the requested version slug or the project's default.
    fn version_slug(
        &self,
        project: &Project,
        options: &ResolveOptions,
    ) -> Result<VersionSlug, ResolveError> {
        match &options.version_slug {
            Some(slug) => Ok(slug.clone()),
            None => Ok(self.repository.default_version_slug(project)?),
        }
    }

    /// Chooses the host family for a resolution.
    fn serving(
        &self,
        project: &Project,
        version_slug: &VersionSlug,
        options: &ResolveOptions,
    ) -> Result<Serving, ResolveError> {
        let external = match options.external {
            Some(external) => external,
            None => self.repository.version_exists_and_matches_type(
                project,
                version_slug.as_str(),
                VersionKind::External,
            )?,
        };
        if external {
            return Ok(Serving::External);
        }
        let canonical = canonical_project(&self.repository, project)?;
        if options.use_canonical_domain
            && let Some(domain) = self.repository.canonical_domain(&canonical)?
        {
            return Ok(Serving::CustomDomain(domain));
        }
        if self.config.use_subdomain {
            Ok(Serving::PublicSubdomain(canonical))
        } else {
            Ok(Serving::ProductionDomain)
        }
    }

    /// Builds the path for the chosen host family.
    fn build_path(
        &self,
        project: &Project,
        version_slug: &VersionSlug,
        options: &ResolveOptions,
        serving: &Serving,
    ) -> Result<String, ResolveError> {
        let language = options.language.as_deref().unwrap_or(&project.language);
        if matches!(serving, Serving::External) {
            // Preview builds belong to the project itself, never to its family.
            return Ok(compose_path(&PathParts {
                base: "/",
                custom_prefix: project.custom_prefix.as_deref(),
                single_version: options.single_version.unwrap_or(project.single_version),
                language,
                version_slug: version_slug.as_str(),
                filename: &options.filename,
            }));
        }
        let location = project_location(&self.repository, project)?;
        let base = match serving {
            Serving::ProductionDomain => {
                let root = format!("/{PATH_BASED_ROOT}/{}/", location.root.slug);
                join_url_path(&[&root, &location.base])
            }
            _ => location.base.clone(),
        };
        Ok(compose_path(&PathParts {
            base: &base,
            custom_prefix: location.prefix_owner.custom_prefix.as_deref(),
            single_version: options.single_version.unwrap_or(location.prefix_owner.single_version),
            language,
            version_slug: version_slug.as_str(),
            filename: &options.filename,
        }))
    }

    /// Returns the public hostname of a canonical project.
    fn public_host(&self, canonical: &Project) -> String {
        if self.config.use_subdomain {
            format!("{}.{}", canonical.slug, self.config.public_domain_suffix)
        } else {
            self.config.production_domain.clone()
        }
    }
}
