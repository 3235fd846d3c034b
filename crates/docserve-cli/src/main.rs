// crates/docserve-cli/src/main.rs
// ============================================================================
// Module: Docserve CLI Entry Point
// Description: Command dispatcher for URL resolution and catalog workflows.
// Purpose: Resolve and unresolve documentation URLs from the command line.
// Dependencies: clap, docserve-config, docserve-core, docserve-store-sqlite,
//               serde_json, thiserror, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `docserve` binary loads `docserve.toml`, opens the configured
//! repository and runs one command: `resolve` prints a URL, `unresolve`
//! prints the decomposed URL as JSON, `import` writes a JSON catalog into a
//! `SQLite` store, and `config` validates or prints example configuration.
//! Diagnostics go to stderr through `tracing`, filtered by `DOCSERVE_LOG`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod backend;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use backend::Backend;
use backend::load_catalog;
use backend::open_backend;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use docserve_config::DocserveConfig;
use docserve_config::config_toml_example;
use docserve_config::path_based_config_toml_example;
use docserve_core::ProjectRepository;
use docserve_core::ResolveOptions;
use docserve_core::Resolver;
use docserve_core::UnresolvedUrl;
use docserve_core::Unresolver;
use docserve_core::VersionRepository;
use serde::Serialize;
use thiserror::Error;
use tracing::Level;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "DOCSERVE_LOG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "docserve", version, disable_help_subcommand = true)]
struct Cli {
    /// Configuration file (overrides `DOCSERVE_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the URL of a project page.
    Resolve(ResolveCommand),
    /// Decompose a URL into project, version and filename.
    Unresolve(UnresolveCommand),
    /// Import a JSON catalog into the configured SQLite store.
    Import(ImportCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Project slug.
    project: String,
    /// Version slug (defaults to the project's default version).
    #[arg(long = "version-slug", value_name = "SLUG")]
    version: Option<String>,
    /// Language segment override.
    #[arg(long)]
    language: Option<String>,
    /// Filename below the version root.
    #[arg(long, default_value = "")]
    filename: String,
    /// Omit language and version segments.
    #[arg(long)]
    single_version: bool,
    /// Ignore canonical custom domains.
    #[arg(long)]
    no_canonical_domain: bool,
    /// Force the https scheme.
    #[arg(long)]
    https: bool,
    /// Query string to append.
    #[arg(long)]
    query: Option<String>,
    /// Treat the version as an external preview build.
    #[arg(long)]
    external: bool,
}

/// Arguments for `unresolve`.
#[derive(Args, Debug)]
struct UnresolveCommand {
    /// Absolute http(s) URL.
    url: String,
    /// Keep directory filenames as-is instead of appending `index.html`.
    #[arg(long)]
    no_index: bool,
}

/// Arguments for `import`.
#[derive(Args, Debug)]
struct ImportCommand {
    /// JSON catalog of projects, versions, domains and subprojects.
    #[arg(long, value_name = "PATH")]
    catalog: PathBuf,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a docserve configuration file.
    Validate,
    /// Print an example configuration file.
    Example(ConfigExampleCommand),
}

/// Arguments for `config example`.
#[derive(Args, Debug)]
struct ConfigExampleCommand {
    /// Print the path-based serving example.
    #[arg(long)]
    path_based: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
pub(crate) struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    pub(crate) const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
pub(crate) type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// JSON output of `unresolve`.
#[derive(Serialize)]
struct UnresolveOutput<'a> {
    /// True when project, version and filename were all identified.
    complete: bool,
    /// Decomposed URL.
    #[serde(flatten)]
    result: &'a UnresolvedUrl,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.command {
        Commands::Resolve(command) => {
            let config = load_config(cli.config.as_deref())?;
            match open_backend(&config.store)? {
                Backend::Memory(store) => command_resolve(&config, store, &command),
                Backend::Sqlite(store) => command_resolve(&config, store, &command),
            }
        }
        Commands::Unresolve(command) => {
            let config = load_config(cli.config.as_deref())?;
            match open_backend(&config.store)? {
                Backend::Memory(store) => command_unresolve(&config, store, &command),
                Backend::Sqlite(store) => command_unresolve(&config, store, &command),
            }
        }
        Commands::Import(command) => command_import(cli.config.as_deref(), &command),
        Commands::Config {
            command,
        } => command_config(cli.config.as_deref(), &command),
    }
}

/// Installs the stderr `tracing` subscriber.
fn init_tracing(verbose: u8) -> CliResult<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let subscriber = Registry::default().with(fmt_layer).with(filter);
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| CliError::new(format!("failed to install logger: {err}")))
}

/// Loads configuration with a uniform error message.
fn load_config(path: Option<&Path>) -> CliResult<DocserveConfig> {
    DocserveConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

// ============================================================================
// SECTION: Resolution Commands
// ============================================================================

/// Executes `resolve`.
fn command_resolve<R>(
    config: &DocserveConfig,
    repository: R,
    command: &ResolveCommand,
) -> CliResult<ExitCode>
where
    R: ProjectRepository + VersionRepository,
{
    let project = repository
        .project_by_slug(&command.project)
        .map_err(|err| CliError::new(err.to_string()))?
        .ok_or_else(|| CliError::new(format!("project not found: {}", command.project)))?;
    let mut options = ResolveOptions::new().with_filename(command.filename.as_str());
    if let Some(version) = &command.version {
        options = options.with_version(version.as_str());
    }
    if let Some(language) = &command.language {
        options = options.with_language(language.as_str());
    }
    if command.single_version {
        options = options.with_single_version(true);
    }
    if command.no_canonical_domain {
        options = options.without_canonical_domain();
    }
    if command.https {
        options = options.with_https();
    }
    if let Some(query) = &command.query {
        options = options.with_query(query.as_str());
    }
    if command.external {
        options = options.with_external(true);
    }
    let resolver = Resolver::new(config.resolver_config(), repository);
    let url = resolver.resolve(&project, &options).map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&url).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `unresolve`.
fn command_unresolve<R>(
    config: &DocserveConfig,
    repository: R,
    command: &UnresolveCommand,
) -> CliResult<ExitCode>
where
    R: ProjectRepository + VersionRepository,
{
    let unresolver = Unresolver::new(config.resolver_config(), repository);
    let result = unresolver
        .unresolve(&command.url, !command.no_index)
        .map_err(|err| CliError::new(err.to_string()))?;
    debug!(complete = result.is_complete(), "url unresolved");
    write_json(&UnresolveOutput {
        complete: result.is_complete(),
        result: &result,
    })?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Catalog Commands
// ============================================================================

/// Executes `import`.
fn command_import(config_path: Option<&Path>, command: &ImportCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let Backend::Sqlite(store) = open_backend(&config.store)? else {
        return Err(CliError::new("import requires a sqlite store".to_string()));
    };
    let catalog = load_catalog(&command.catalog)?;
    let summary = store
        .import_catalog(&catalog)
        .map_err(|err| CliError::new(format!("import failed: {err}")))?;
    write_json(&summary)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(config_path: Option<&Path>, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            let _config = load_config(config_path)?;
            write_stdout_line("config valid")
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example(command) => {
            let example = if command.path_based {
                path_based_config_toml_example()
            } else {
                config_toml_example()
            };
            write_stdout_bytes(example.as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes pretty JSON followed by a newline to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
