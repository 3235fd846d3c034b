// crates/docserve-core/src/runtime/unresolver.rs
// ============================================================================
// Module: Docserve Unresolver
// Description: URL to project/version/filename decomposition.
// Purpose: Invert resolver output for request routing and diagnostics.
// Dependencies: crate::{core, interfaces}, serde, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! The unresolver walks an incoming URL through a fixed sequence of states:
//! host resolution, prefix stripping, subproject/translation selection,
//! version extraction and filename extraction. Every transition either
//! advances or fails:
//!
//! - Total failures (unknown host, malformed preview host, a path that fits
//!   no prefix, invalid prefix overlaps) return [`UnresolveError`] and never
//!   leak a partially identified project.
//! - Partial results identify the project but leave `version` and `filename`
//!   empty (unknown language code, missing or mismatched version).
//!
//! Queries and fragments are preserved on the parsed [`Url`] and never
//! interpreted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::warn;
use url::Url;

use crate::core::DEFAULT_SUBPROJECT_PREFIX;
use crate::core::Domain;
use crate::core::EXTERNAL_VERSION_SEPARATOR;
use crate::core::PATH_BASED_ROOT;
use crate::core::Project;
use crate::core::ResolverConfig;
use crate::core::Version;
use crate::core::prefix::collapse_slashes;
use crate::core::prefix::decode_path;
use crate::core::prefix::is_segment_descendant;
use crate::core::prefix::looks_like_language_code;
use crate::core::prefix::normalize_prefix;
use crate::core::prefix::path_segments;
use crate::core::prefix::segment_count;
use crate::core::prefix::split_first_segment;
use crate::core::prefix::strip_path_prefix;
use crate::interfaces::ProjectRepository;
use crate::interfaces::RepositoryError;
use crate::interfaces::VersionRepository;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Unresolver failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Every variant except `Repository` maps to a not-found response.
#[derive(Debug, Error)]
pub enum UnresolveError {
    /// The input is not an absolute http(s) URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// No project matches the host.
    #[error("unknown host: {0}")]
    UnknownHost(String),
    /// The host sits under the external suffix without `{slug}--{version}`.
    #[error("invalid external version host: {0}")]
    InvalidExternalHost(String),
    /// The path does not decompose under the configured prefixes.
    #[error("path not found: {0}")]
    PathNotFound(String),
    /// The path reaches a subproject through an invalid prefix overlap.
    #[error("invalid overlapping prefixes: {0}")]
    PrefixOverlap(String),
    /// A repository lookup failed.
    #[error("unresolve failed: {0}")]
    Repository(#[from] RepositoryError),
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// How a request host was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSource {
    /// Registered custom domain.
    CustomDomain,
    /// `{slug}.{public_domain_suffix}`.
    PublicDomain,
    /// `{slug}--{version}.{external_domain_suffix}`.
    ExternalDomain,
    /// `production_domain` in path-based mode.
    ProductionDomain,
}

/// Outcome of host resolution.
///
/// # Invariants
/// - `project` is `None` only for [`DomainSource::ProductionDomain`].
/// - `domain` is set only for [`DomainSource::CustomDomain`].
/// - `external_version_slug` is set only for [`DomainSource::ExternalDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDomain {
    /// Normalized request host (lowercase, no port).
    pub source_domain: String,
    /// How the host was recognized.
    pub source: DomainSource,
    /// Project owning the host.
    pub project: Option<Project>,
    /// Matched custom domain record.
    pub domain: Option<Domain>,
    /// Version slug encoded in an external preview host.
    pub external_version_slug: Option<String>,
}

/// Outcome of path decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedPath {
    /// Project matched by the host (or the path-based slug).
    pub parent_project: Project,
    /// Project after subproject and translation retargeting.
    pub project: Project,
    /// Matched version, `None` for partial results.
    pub version: Option<Version>,
    /// Filename with a leading `/`, `None` for partial results.
    pub filename: Option<String>,
}

/// Full unresolver result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedUrl {
    /// Project matched by the host (or the path-based slug).
    pub parent_project: Project,
    /// Project after subproject and translation retargeting.
    pub project: Project,
    /// Matched version, `None` for partial results.
    pub version: Option<Version>,
    /// Filename with a leading `/`, `None` for partial results.
    pub filename: Option<String>,
    /// Parsed request URL, query and fragment included.
    pub url: Url,
    /// Host resolution details.
    pub domain: UnresolvedDomain,
}

impl UnresolvedUrl {
    /// Returns true when project, version and filename were all identified.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.version.is_some() && self.filename.is_some()
    }
}

/// Project, version and filename matched below one candidate project.
#[derive(Debug)]
struct PathMatch {
    /// Retargeted project.
    project: Project,
    /// Matched version.
    version: Option<Version>,
    /// Extracted filename.
    filename: Option<String>,
}

impl PathMatch {
    /// Builds a partial match with no version or filename.
    const fn partial(project: Project) -> Self {
        Self {
            project,
            version: None,
            filename: None,
        }
    }
}

// ============================================================================
// SECTION: Unresolver
// ============================================================================

/// Decomposes documentation URLs into project, version and filename.
///
/// # Invariants
/// - Stateless apart from the injected configuration and repository.
/// - Results are identical across calls for a fixed repository snapshot.
#[derive(Debug, Clone)]
pub struct Unresolver<R> {
    /// Addressing configuration.
    config: ResolverConfig,
    /// Project and version lookups.
    repository: R,
}

impl<R> Unresolver<R>
where
    R: ProjectRepository + VersionRepository,
{
    /// Creates an unresolver over the given configuration and repository.
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

    /// Unresolves an absolute URL.
    ///
    /// When `append_indexhtml` is set, empty and directory filenames gain an
    /// `index.html` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolveError`] when the URL names no project.
    pub fn unresolve(&self, raw: &str, append_indexhtml: bool) -> Result<UnresolvedUrl, UnresolveError> {
        let url = Url::parse(raw.trim()).map_err(|err| {
            debug!(url = raw, error = %err, "rejecting unparsable url");
            UnresolveError::InvalidUrl(format!("{raw}: {err}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UnresolveError::InvalidUrl(format!("unsupported scheme: {}", url.scheme())));
        }
        let host = url
            .host_str()
            .ok_or_else(|| UnresolveError::InvalidUrl(format!("{raw}: missing host")))?;
        let domain = self.unresolve_domain(host)?;
        let path = self.unresolve_path(&domain, url.path(), append_indexhtml)?;
        Ok(UnresolvedUrl {
            parent_project: path.parent_project,
            project: path.project,
            version: path.version,
            filename: path.filename,
            url,
            domain,
        })
    }

    /// Resolves a request host to its project.
    ///
    /// Hosts are matched against custom domains, the external preview
    /// pattern, the production domain (path-based mode) and the public
    /// subdomain pattern, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolveError`] when the host names no project.
    pub fn unresolve_domain(&self, host: &str) -> Result<UnresolvedDomain, UnresolveError> {
        let source_domain = normalize_host(host);
        if source_domain.is_empty() {
            return Err(UnresolveError::UnknownHost(host.to_string()));
        }

        if let Some((project, domain)) = self.repository.project_by_domain(&source_domain)? {
            return Ok(UnresolvedDomain {
                source_domain,
                source: DomainSource::CustomDomain,
                project: Some(project),
                domain: Some(domain),
                external_version_slug: None,
            });
        }

        if let Some(label) = subdomain_label(&source_domain, &self.config.external_domain_suffix) {
            let (slug, version_slug) = label
                .rsplit_once(EXTERNAL_VERSION_SEPARATOR)
                .filter(|(slug, version)| {
                    !slug.is_empty() && !version.is_empty() && !label.contains('.')
                })
                .ok_or_else(|| {
                    debug!(host = %source_domain, "external host lacks slug--version label");
                    UnresolveError::InvalidExternalHost(source_domain.clone())
                })?;
            let project = self.repository.project_by_slug(slug)?.ok_or_else(|| {
                debug!(host = %source_domain, slug, "no project for external host");
                UnresolveError::UnknownHost(source_domain.clone())
            })?;
            let version_slug = version_slug.to_string();
            return Ok(UnresolvedDomain {
                source_domain,
                source: DomainSource::ExternalDomain,
                project: Some(project),
                domain: None,
                external_version_slug: Some(version_slug),
            });
        }

        if !self.config.use_subdomain && source_domain == self.config.production_domain {
            return Ok(UnresolvedDomain {
                source_domain,
                source: DomainSource::ProductionDomain,
                project: None,
                domain: None,
                external_version_slug: None,
            });
        }

        if self.config.use_subdomain
            && let Some(label) = subdomain_label(&source_domain, &self.config.public_domain_suffix)
            && !label.contains('.')
            && let Some(project) = self.repository.project_by_slug(label)?
        {
            return Ok(UnresolvedDomain {
                source_domain,
                source: DomainSource::PublicDomain,
                project: Some(project),
                domain: None,
                external_version_slug: None,
            });
        }

        debug!(host = %source_domain, "host matches no project");
        Err(UnresolveError::UnknownHost(source_domain))
    }

    /// Decomposes a request path served from an already resolved host.
    ///
    /// `path` is the percent-encoded URL path. Segments are decoded before
    /// prefixes, versions and filenames are matched, so the returned filename
    /// is in decoded form.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolveError`] when the path fits no configured prefix.
    pub fn unresolve_path(
        &self,
        domain: &UnresolvedDomain,
        path: &str,
        append_indexhtml: bool,
    ) -> Result<UnresolvedPath, UnresolveError> {
        let path = collapse_slashes(&format!("/{}", decode_path(path)));
        let (parent, matched) = match (domain.source, &domain.project) {
            (DomainSource::ProductionDomain, _) => {
                let root = format!("/{PATH_BASED_ROOT}/");
                let (slug, rest) = strip_path_prefix(&path, &root)
                    .and_then(split_first_segment)
                    .ok_or_else(|| not_found(&path))?;
                let project = self.repository.project_by_slug(slug)?.ok_or_else(|| {
                    debug!(path = %path, slug, "no project for path-based slug");
                    not_found(&path)
                })?;
                let matched = self.match_project(&project, non_empty_path(rest))?;
                (project, matched)
            }
            (DomainSource::ExternalDomain, Some(project)) => {
                let version_slug = domain.external_version_slug.as_deref().unwrap_or_default();
                let matched = self.match_external(project, version_slug, &path)?;
                (project.clone(), matched)
            }
            (_, Some(project)) => {
                let matched = self.match_project(project, &path)?;
                (project.clone(), matched)
            }
            (_, None) => return Err(UnresolveError::UnknownHost(domain.source_domain.clone())),
        };
        let matched = matched.ok_or_else(|| {
            debug!(host = %domain.source_domain, path = %path, "path matches no prefix");
            not_found(&path)
        })?;
        Ok(UnresolvedPath {
            parent_project: parent,
            project: matched.project,
            version: matched.version,
            filename: matched.filename.map(|filename| finish_filename(filename, append_indexhtml)),
        })
    }

    /// Matches `path` below `project`, trying the longer of its own and its
    /// subproject prefix first.
    fn match_project(&self, project: &Project, path: &str) -> Result<Option<PathMatch>, UnresolveError> {
        let own_prefix = normalize_prefix(project.custom_prefix.as_deref().unwrap_or("/"));
        let subproject_prefix = normalize_prefix(
            project.custom_subproject_prefix.as_deref().unwrap_or(DEFAULT_SUBPROJECT_PREFIX),
        );
        if segment_count(&subproject_prefix) >= segment_count(&own_prefix) {
            if let Some(matched) =
                self.match_subproject(project, &own_prefix, &subproject_prefix, path)?
            {
                return Ok(Some(matched));
            }
            return self.match_own(project, &own_prefix, path);
        }
        if let Some(matched) = self.match_own(project, &own_prefix, path)? {
            return Ok(Some(matched));
        }
        self.match_subproject(project, &own_prefix, &subproject_prefix, path)
    }

    /// Matches a subproject addressed through `subproject_prefix`.
    fn match_subproject(
        &self,
        project: &Project,
        own_prefix: &str,
        subproject_prefix: &str,
        path: &str,
    ) -> Result<Option<PathMatch>, UnresolveError> {
        let Some((segment, rest)) =
            strip_path_prefix(path, subproject_prefix).and_then(split_first_segment)
        else {
            return Ok(None);
        };
        let Some((child, _)) = self
            .repository
            .subprojects(project)?
            .into_iter()
            .find(|(child, relation)| relation.path_segment(child) == segment)
        else {
            return Ok(None);
        };
        if is_invalid_overlap(own_prefix, subproject_prefix) {
            warn!(
                project = %project.slug,
                own_prefix,
                subproject_prefix,
                "subproject prefix overlaps a language segment"
            );
            return Err(UnresolveError::PrefixOverlap(format!(
                "{}: {subproject_prefix} under {own_prefix}",
                project.slug
            )));
        }
        self.match_project(&child, non_empty_path(rest))
    }

    /// Matches the project's own pages (or a translation) under `own_prefix`.
    fn match_own(
        &self,
        project: &Project,
        own_prefix: &str,
        path: &str,
    ) -> Result<Option<PathMatch>, UnresolveError> {
        let Some(rest) = strip_path_prefix(path, own_prefix) else {
            return Ok(None);
        };
        if project.single_version {
            let slug = self.repository.default_version_slug(project)?;
            return Ok(Some(match self.repository.version(project, slug.as_str())? {
                Some(version) => PathMatch {
                    project: project.clone(),
                    version: Some(version),
                    filename: Some(rest.to_string()),
                },
                None => {
                    debug!(project = %project.slug, version = %slug, "default version missing");
                    PathMatch::partial(project.clone())
                }
            }));
        }
        let Some((language, rest)) = split_first_segment(rest) else {
            debug!(project = %project.slug, "bare prefix without language segment");
            return Ok(Some(PathMatch::partial(project.clone())));
        };
        let target = if language == project.language {
            project.clone()
        } else if let Some(translation) = self
            .repository
            .translations(project)?
            .into_iter()
            .find(|translation| translation.language == language)
        {
            translation
        } else if looks_like_language_code(language) {
            debug!(project = %project.slug, language, "unknown translation language");
            return Ok(Some(PathMatch::partial(project.clone())));
        } else {
            return Ok(None);
        };
        let Some((version_slug, rest)) = split_first_segment(rest) else {
            return Ok(Some(PathMatch::partial(target)));
        };
        match self.repository.version(&target, version_slug)? {
            Some(version) if !version.is_external() => Ok(Some(PathMatch {
                project: target,
                version: Some(version),
                filename: Some(non_empty_path(rest).to_string()),
            })),
            _ => {
                debug!(project = %target.slug, version = version_slug, "no internal version");
                Ok(Some(PathMatch::partial(target)))
            }
        }
    }

    /// Matches a path served from an external preview host.
    ///
    /// Only the version encoded in the host is ever served; any other version
    /// segment yields a partial result.
    fn match_external(
        &self,
        project: &Project,
        version_slug: &str,
        path: &str,
    ) -> Result<Option<PathMatch>, UnresolveError> {
        let own_prefix = normalize_prefix(project.custom_prefix.as_deref().unwrap_or("/"));
        let Some(rest) = strip_path_prefix(path, &own_prefix) else {
            return Ok(None);
        };
        let version = self
            .repository
            .version(project, version_slug)?
            .filter(Version::is_external);
        let Some(version) = version else {
            debug!(project = %project.slug, version = version_slug, "no external version for host");
            return Ok(Some(PathMatch::partial(project.clone())));
        };
        if project.single_version {
            return Ok(Some(PathMatch {
                project: project.clone(),
                version: Some(version),
                filename: Some(rest.to_string()),
            }));
        }
        let mut segments = path_segments(rest);
        let language = segments.next();
        let path_version = segments.next();
        if language != Some(project.language.as_str()) || path_version != Some(version_slug) {
            debug!(
                project = %project.slug,
                version = version_slug,
                "external path does not match host version"
            );
            return Ok(Some(PathMatch::partial(project.clone())));
        }
        let filename = split_first_segment(rest)
            .and_then(|(_, rest)| split_first_segment(rest))
            .map_or("/", |(_, rest)| non_empty_path(rest));
        Ok(Some(PathMatch {
            project: project.clone(),
            version: Some(version),
            filename: Some(filename.to_string()),
        }))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Lowercases a host and strips any port and trailing dot.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = if host.starts_with('[') {
        host.split_once(']').map_or(host, |(address, _)| address.trim_start_matches('['))
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => host,
        }
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// Returns the label(s) of `host` below `suffix`, if any.
fn subdomain_label<'a>(host: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() {
        return None;
    }
    host.strip_suffix(suffix)?
        .strip_suffix('.')
        .filter(|label| !label.is_empty())
}

/// Returns true when a subproject prefix nested under the own prefix begins
/// with a language-shaped segment.
fn is_invalid_overlap(own_prefix: &str, subproject_prefix: &str) -> bool {
    if own_prefix == "/" || !is_segment_descendant(subproject_prefix, own_prefix) {
        return false;
    }
    strip_path_prefix(subproject_prefix, own_prefix)
        .and_then(split_first_segment)
        .is_some_and(|(segment, _)| looks_like_language_code(segment))
}

/// Maps an empty remainder to the root path.
fn non_empty_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

/// Applies the leading slash and the optional index document.
fn finish_filename(filename: String, append_indexhtml: bool) -> String {
    let mut filename = if filename.starts_with('/') { filename } else { format!("/{filename}") };
    if append_indexhtml && filename.ends_with('/') {
        filename.push_str("index.html");
    }
    filename
}

/// Builds a not-found error for `path`.
fn not_found(path: &str) -> UnresolveError {
    UnresolveError::PathNotFound(path.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_host_strips_port_and_case() {
        assert_eq!(normalize_host("Pip.ReadTheDocs.IO:8000"), "pip.readthedocs.io");
        assert_eq!(normalize_host("docs.example.com."), "docs.example.com");
        assert_eq!(normalize_host("[::1]:8080"), "::1");
    }

    #[test]
    fn subdomain_label_requires_dot_boundary() {
        assert_eq!(subdomain_label("pip.readthedocs.io", "readthedocs.io"), Some("pip"));
        assert_eq!(subdomain_label("pipreadthedocs.io", "readthedocs.io"), None);
        assert_eq!(subdomain_label("readthedocs.io", "readthedocs.io"), None);
    }

    #[test]
    fn overlap_rule_flags_language_segments_only() {
        assert!(is_invalid_overlap("/prefix/", "/prefix/es/"));
        assert!(!is_invalid_overlap("/prefix/", "/prefix/projects/"));
        assert!(!is_invalid_overlap("/prefix/", "/other/"));
        assert!(!is_invalid_overlap("/", "/es/"));
    }

    #[test]
    fn overlap_rule_ignores_siblings_and_identical_prefixes() {
        assert!(!is_invalid_overlap("/prefix/", "/prefix-es/"));
        assert!(!is_invalid_overlap("/prefix/", "/prefix/"));
        assert!(is_invalid_overlap("/docs/prefix/", "/docs/prefix/pt_BR/"));
    }

    #[test]
    fn filenames_gain_index_document() {
        assert_eq!(finish_filename("/".to_string(), true), "/index.html");
        assert_eq!(finish_filename("/api/".to_string(), false), "/api/");
        assert_eq!(finish_filename("/a.html".to_string(), true), "/a.html");
    }
}
