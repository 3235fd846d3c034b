// crates/docserve-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Project Store
// Description: Durable project/version repository backed by SQLite.
// Purpose: Serve resolver lookups from a persistent catalog.
// Dependencies: docserve-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`ProjectRepository`] and [`VersionRepository`] on
//! top of `SQLite`. Projects, versions, custom domains and subproject
//! relations live in their own tables; listings are ordered by key so every
//! lookup is deterministic. Rows are validated on read and fail closed on
//! corruption (zero or negative ids, unknown enum labels).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use docserve_core::Domain;
use docserve_core::PrivacyLevel;
use docserve_core::Project;
use docserve_core::ProjectCatalog;
use docserve_core::ProjectId;
use docserve_core::ProjectRepository;
use docserve_core::ProjectSlug;
use docserve_core::RepositoryError;
use docserve_core::SubprojectRelation;
use docserve_core::Version;
use docserve_core::VersionId;
use docserve_core::VersionRepository;
use docserve_core::VersionSlug;
use docserve_core::VersionType;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Project columns in [`ProjectRow`] order.
const PROJECT_COLUMNS: &str = "id, slug, language, privacy_level, single_version, custom_prefix, \
                               custom_subproject_prefix, main_language_project, default_version";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` project store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default timeout and pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored rows violate model invariants.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid input data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

impl From<SqliteStoreError> for RepositoryError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Backend(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => {
                Self::Backend(format!("schema version mismatch: {message}"))
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Import Summary
// ============================================================================

/// Record counts written by [`SqliteProjectStore::import_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Projects written.
    pub projects: usize,
    /// Versions written.
    pub versions: usize,
    /// Domains written.
    pub domains: usize,
    /// Subproject relations written.
    pub subprojects: usize,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed project repository.
///
/// # Invariants
/// - A project has at most one superproject (`child_id` is the relation key).
/// - Domain hostnames are stored lowercase.
#[derive(Clone)]
pub struct SqliteProjectStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteProjectStore").field("config", &self.config).finish_non_exhaustive()
    }
}

impl SqliteProjectStore {
    /// Opens (and initializes when new) an `SQLite` project store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Inserts or replaces a project.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] when the slug is not lowercase and
    /// [`SqliteStoreError`] when the write fails (e.g. duplicate slug).
    pub fn upsert_project(&self, project: &Project) -> Result<(), SqliteStoreError> {
        self.with_connection(|connection| write_project(connection, project))
    }

    /// Inserts or replaces a version.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails (e.g. unknown project).
    pub fn upsert_version(&self, version: &Version) -> Result<(), SqliteStoreError> {
        self.with_connection(|connection| write_version(connection, version))
    }

    /// Inserts or replaces a custom domain.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails (e.g. unknown project).
    pub fn upsert_domain(&self, domain: &Domain) -> Result<(), SqliteStoreError> {
        self.with_connection(|connection| write_domain(connection, domain))
    }

    /// Nests a project under a superproject, replacing any previous parent.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the write fails (e.g. unknown project).
    pub fn add_subproject(&self, relation: &SubprojectRelation) -> Result<(), SqliteStoreError> {
        self.with_connection(|connection| write_relation(connection, relation))
    }

    /// Writes every record of a catalog in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when any record is rejected; nothing is
    /// written in that case.
    pub fn import_catalog(&self, catalog: &ProjectCatalog) -> Result<ImportSummary, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction()?;
        for project in &catalog.projects {
            write_project(&tx, project)?;
        }
        for version in &catalog.versions {
            write_version(&tx, version)?;
        }
        for domain in &catalog.domains {
            write_domain(&tx, domain)?;
        }
        for relation in &catalog.subprojects {
            write_relation(&tx, relation)?;
        }
        tx.commit()?;
        drop(guard);
        Ok(ImportSummary {
            projects: catalog.projects.len(),
            versions: catalog.versions.len(),
            domains: catalog.domains.len(),
            subprojects: catalog.subprojects.len(),
        })
    }

    /// Runs `f` against the locked connection.
    fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, SqliteStoreError>,
    ) -> Result<T, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let result = f(&guard);
        drop(guard);
        result
    }

    /// Loads a project by id.
    fn load_project(&self, id: ProjectId) -> Result<Option<Project>, SqliteStoreError> {
        self.with_connection(|connection| query_project(connection, "id = ?1", params![to_sql_id(id.get())?]))
    }
}

// ============================================================================
// SECTION: Repository Implementations
// ============================================================================

impl ProjectRepository for SqliteProjectStore {
    fn project_by_id(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(self.load_project(id)?)
    }

    fn project_by_slug(&self, slug: &str) -> Result<Option<Project>, RepositoryError> {
        Ok(self.with_connection(|connection| query_project(connection, "slug = ?1", params![slug]))?)
    }

    fn project_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<(Project, Domain)>, RepositoryError> {
        let hostname = hostname.to_ascii_lowercase();
        let domain = self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT domain, project_id, canonical, https FROM domains WHERE domain = ?1",
                    params![hostname],
                    DomainRow::from_row,
                )
                .optional()?
                .map(DomainRow::into_domain)
                .transpose()
        })?;
        let Some(domain) = domain else {
            return Ok(None);
        };
        Ok(self.load_project(domain.project_id)?.map(|project| (project, domain)))
    }

    fn domains(&self, project: &Project) -> Result<Vec<Domain>, RepositoryError> {
        let id = to_sql_id(project.id.get())?;
        Ok(self.with_connection(|connection| {
            let mut statement = connection.prepare(
                "SELECT domain, project_id, canonical, https FROM domains WHERE project_id = ?1 \
                 ORDER BY domain",
            )?;
            let rows = statement.query_map(params![id], DomainRow::from_row)?;
            rows.map(|row| row?.into_domain()).collect()
        })?)
    }

    fn superproject(
        &self,
        project: &Project,
    ) -> Result<Option<(Project, SubprojectRelation)>, RepositoryError> {
        let id = to_sql_id(project.id.get())?;
        let relation = self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT parent_id, child_id, alias FROM subproject_relations WHERE child_id = ?1",
                    params![id],
                    RelationRow::from_row,
                )
                .optional()?
                .map(RelationRow::into_relation)
                .transpose()
        })?;
        let Some(relation) = relation else {
            return Ok(None);
        };
        Ok(self.load_project(relation.parent_id)?.map(|parent| (parent, relation)))
    }

    fn subprojects(
        &self,
        project: &Project,
    ) -> Result<Vec<(Project, SubprojectRelation)>, RepositoryError> {
        let id = to_sql_id(project.id.get())?;
        let relations = self.with_connection(|connection| {
            let mut statement = connection.prepare(
                "SELECT parent_id, child_id, alias FROM subproject_relations WHERE parent_id = ?1 \
                 ORDER BY child_id",
            )?;
            let rows = statement.query_map(params![id], RelationRow::from_row)?;
            rows.map(|row| row?.into_relation()).collect::<Result<Vec<_>, _>>()
        })?;
        let mut children = Vec::with_capacity(relations.len());
        for relation in relations {
            if let Some(child) = self.load_project(relation.child_id)? {
                children.push((child, relation));
            }
        }
        Ok(children)
    }

    fn translations(&self, project: &Project) -> Result<Vec<Project>, RepositoryError> {
        let id = to_sql_id(project.id.get())?;
        Ok(self.with_connection(|connection| {
            let mut statement = connection.prepare(&format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE main_language_project = ?1 AND id != \
                 ?1 ORDER BY id"
            ))?;
            let rows = statement.query_map(params![id], ProjectRow::from_row)?;
            rows.map(|row| row?.into_project()).collect()
        })?)
    }
}

impl VersionRepository for SqliteProjectStore {
    fn version(&self, project: &Project, slug: &str) -> Result<Option<Version>, RepositoryError> {
        let id = to_sql_id(project.id.get())?;
        Ok(self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT id, project_id, slug, version_type, privacy_level FROM versions WHERE \
                     project_id = ?1 AND slug = ?2",
                    params![id, slug],
                    VersionRow::from_row,
                )
                .optional()?
                .map(VersionRow::into_version)
                .transpose()
        })?)
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Raw `projects` row.
struct ProjectRow {
    /// Project id.
    id: i64,
    /// Project slug.
    slug: String,
    /// Language code.
    language: String,
    /// Privacy label.
    privacy_level: String,
    /// Single-version flag.
    single_version: bool,
    /// Custom prefix.
    custom_prefix: Option<String>,
    /// Custom subproject prefix.
    custom_subproject_prefix: Option<String>,
    /// Main project id for translations.
    main_language_project: Option<i64>,
    /// Default version slug.
    default_version: Option<String>,
}

impl ProjectRow {
    /// Reads a row selected with [`PROJECT_COLUMNS`].
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            slug: row.get(1)?,
            language: row.get(2)?,
            privacy_level: row.get(3)?,
            single_version: row.get(4)?,
            custom_prefix: row.get(5)?,
            custom_subproject_prefix: row.get(6)?,
            main_language_project: row.get(7)?,
            default_version: row.get(8)?,
        })
    }

    /// Validates the row into a [`Project`].
    fn into_project(self) -> Result<Project, SqliteStoreError> {
        Ok(Project {
            id: project_id_from_sql(self.id)?,
            slug: ProjectSlug::new(self.slug),
            language: self.language,
            privacy_level: privacy_from_sql(&self.privacy_level)?,
            single_version: self.single_version,
            custom_prefix: self.custom_prefix,
            custom_subproject_prefix: self.custom_subproject_prefix,
            main_language_project: self.main_language_project.map(project_id_from_sql).transpose()?,
            default_version: self.default_version.map(VersionSlug::new),
        })
    }
}

/// Raw `versions` row.
struct VersionRow {
    /// Version id.
    id: i64,
    /// Owning project id.
    project_id: i64,
    /// Version slug.
    slug: String,
    /// Version type label.
    version_type: String,
    /// Privacy label.
    privacy_level: String,
}

impl VersionRow {
    /// Reads a version row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            slug: row.get(2)?,
            version_type: row.get(3)?,
            privacy_level: row.get(4)?,
        })
    }

    /// Validates the row into a [`Version`].
    fn into_version(self) -> Result<Version, SqliteStoreError> {
        let id = u64::try_from(self.id)
            .ok()
            .and_then(VersionId::from_raw)
            .ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid version id: {}", self.id)))?;
        let version_type = VersionType::parse(&self.version_type).ok_or_else(|| {
            SqliteStoreError::Corrupt(format!("unknown version type: {}", self.version_type))
        })?;
        Ok(Version {
            id,
            project_id: project_id_from_sql(self.project_id)?,
            slug: VersionSlug::new(self.slug),
            version_type,
            privacy_level: privacy_from_sql(&self.privacy_level)?,
        })
    }
}

/// Raw `domains` row.
struct DomainRow {
    /// Hostname.
    domain: String,
    /// Owning project id.
    project_id: i64,
    /// Canonical flag.
    canonical: bool,
    /// Https flag.
    https: bool,
}

impl DomainRow {
    /// Reads a domain row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            domain: row.get(0)?,
            project_id: row.get(1)?,
            canonical: row.get(2)?,
            https: row.get(3)?,
        })
    }

    /// Validates the row into a [`Domain`].
    fn into_domain(self) -> Result<Domain, SqliteStoreError> {
        Ok(Domain {
            domain: self.domain,
            project_id: project_id_from_sql(self.project_id)?,
            canonical: self.canonical,
            https: self.https,
        })
    }
}

/// Raw `subproject_relations` row.
struct RelationRow {
    /// Superproject id.
    parent_id: i64,
    /// Subproject id.
    child_id: i64,
    /// Optional alias.
    alias: Option<String>,
}

impl RelationRow {
    /// Reads a relation row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            parent_id: row.get(0)?,
            child_id: row.get(1)?,
            alias: row.get(2)?,
        })
    }

    /// Validates the row into a [`SubprojectRelation`].
    fn into_relation(self) -> Result<SubprojectRelation, SqliteStoreError> {
        Ok(SubprojectRelation {
            parent_id: project_id_from_sql(self.parent_id)?,
            child_id: project_id_from_sql(self.child_id)?,
            alias: self.alias,
        })
    }
}

// ============================================================================
// SECTION: Writes
// ============================================================================

/// Upserts a project row.
fn write_project(connection: &Connection, project: &Project) -> Result<(), SqliteStoreError> {
    if !project.slug.is_lowercase() {
        return Err(SqliteStoreError::Invalid(format!(
            "project slug must be lowercase: {}",
            project.slug
        )));
    }
    let main = project.main_language_project.map(|id| to_sql_id(id.get())).transpose()?;
    connection.execute(
        "INSERT INTO projects (id, slug, language, privacy_level, single_version, custom_prefix, \
         custom_subproject_prefix, main_language_project, default_version)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(id) DO UPDATE SET slug = excluded.slug, language = excluded.language,
             privacy_level = excluded.privacy_level, single_version = excluded.single_version,
             custom_prefix = excluded.custom_prefix,
             custom_subproject_prefix = excluded.custom_subproject_prefix,
             main_language_project = excluded.main_language_project,
             default_version = excluded.default_version",
        params![
            to_sql_id(project.id.get())?,
            project.slug.as_str(),
            project.language,
            project.privacy_level.as_str(),
            project.single_version,
            project.custom_prefix,
            project.custom_subproject_prefix,
            main,
            project.default_version.as_ref().map(VersionSlug::as_str),
        ],
    )?;
    Ok(())
}

/// Upserts a version row.
fn write_version(connection: &Connection, version: &Version) -> Result<(), SqliteStoreError> {
    connection.execute(
        "INSERT INTO versions (id, project_id, slug, version_type, privacy_level)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET project_id = excluded.project_id, slug = excluded.slug,
             version_type = excluded.version_type, privacy_level = excluded.privacy_level",
        params![
            to_sql_id(version.id.get())?,
            to_sql_id(version.project_id.get())?,
            version.slug.as_str(),
            version.version_type.as_str(),
            version.privacy_level.as_str(),
        ],
    )?;
    Ok(())
}

/// Upserts a domain row (hostname lowercased).
fn write_domain(connection: &Connection, domain: &Domain) -> Result<(), SqliteStoreError> {
    let hostname = domain.domain.trim().to_ascii_lowercase();
    if hostname.is_empty() {
        return Err(SqliteStoreError::Invalid("domain hostname must be non-empty".to_string()));
    }
    connection.execute(
        "INSERT INTO domains (domain, project_id, canonical, https) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(domain) DO UPDATE SET project_id = excluded.project_id,
             canonical = excluded.canonical, https = excluded.https",
        params![hostname, to_sql_id(domain.project_id.get())?, domain.canonical, domain.https],
    )?;
    Ok(())
}

/// Upserts a subproject relation row.
fn write_relation(
    connection: &Connection,
    relation: &SubprojectRelation,
) -> Result<(), SqliteStoreError> {
    connection.execute(
        "INSERT INTO subproject_relations (child_id, parent_id, alias) VALUES (?1, ?2, ?3)
         ON CONFLICT(child_id) DO UPDATE SET parent_id = excluded.parent_id, alias = excluded.alias",
        params![
            to_sql_id(relation.child_id.get())?,
            to_sql_id(relation.parent_id.get())?,
            relation.alias,
        ],
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Selects at most one project matching `predicate`.
fn query_project(
    connection: &Connection,
    predicate: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Option<Project>, SqliteStoreError> {
    connection
        .query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE {predicate}"),
            params,
            ProjectRow::from_row,
        )
        .optional()?
        .map(ProjectRow::into_project)
        .transpose()
}

/// Converts an identifier into an `SQLite` integer.
fn to_sql_id(raw: u64) -> Result<i64, SqliteStoreError> {
    i64::try_from(raw).map_err(|_| SqliteStoreError::Invalid(format!("identifier too large: {raw}")))
}

/// Converts a stored integer into a project id.
fn project_id_from_sql(raw: i64) -> Result<ProjectId, SqliteStoreError> {
    u64::try_from(raw)
        .ok()
        .and_then(ProjectId::from_raw)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid project id: {raw}")))
}

/// Parses a stored privacy label.
fn privacy_from_sql(label: &str) -> Result<PrivacyLevel, SqliteStoreError> {
    PrivacyLevel::parse(label)
        .ok_or_else(|| SqliteStoreError::Corrupt(format!("unknown privacy level: {label}")))
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must be non-empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with the configured pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))?;
    connection.busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS projects (
                    id INTEGER PRIMARY KEY,
                    slug TEXT NOT NULL UNIQUE,
                    language TEXT NOT NULL,
                    privacy_level TEXT NOT NULL,
                    single_version INTEGER NOT NULL,
                    custom_prefix TEXT,
                    custom_subproject_prefix TEXT,
                    main_language_project INTEGER,
                    default_version TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_projects_main_language
                    ON projects (main_language_project);
                CREATE TABLE IF NOT EXISTS versions (
                    id INTEGER PRIMARY KEY,
                    project_id INTEGER NOT NULL,
                    slug TEXT NOT NULL,
                    version_type TEXT NOT NULL,
                    privacy_level TEXT NOT NULL,
                    UNIQUE (project_id, slug),
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
                );
                CREATE TABLE IF NOT EXISTS domains (
                    domain TEXT PRIMARY KEY,
                    project_id INTEGER NOT NULL,
                    canonical INTEGER NOT NULL,
                    https INTEGER NOT NULL,
                    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_domains_project_id ON domains (project_id);
                CREATE TABLE IF NOT EXISTS subproject_relations (
                    child_id INTEGER PRIMARY KEY,
                    parent_id INTEGER NOT NULL,
                    alias TEXT,
                    FOREIGN KEY (child_id) REFERENCES projects(id) ON DELETE CASCADE,
                    FOREIGN KEY (parent_id) REFERENCES projects(id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_subproject_relations_parent_id
                    ON subproject_relations (parent_id);",
            )?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit()?;
    Ok(())
}
