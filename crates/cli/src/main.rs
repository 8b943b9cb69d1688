// sgrid - UK sponsor register from the command line
//
// `serve` runs the HTTP API; `sync`, `search` and `stats` are one-shot
// commands that print to stdout and log to stderr.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sponsorgrid_config::{ConfigError, Settings};
use sponsorgrid_core::catalog::mock_sponsors;
use sponsorgrid_core::Sponsor;
use sponsorgrid_engine::{compute_stats, search, Params, SearchFilters};
use sponsorgrid_io::ingest::read_register_file;
use sponsorgrid_io::{parse_register_csv, IngestError, Normalizer, SkippedRow};
use sponsorgrid_register_client::{ingest, CsvSource, FileSource, IngestOutcome, RegisterClient};
use sponsorgrid_server::{start_server, AppState, ServerError};
use tracing_subscriber::{fmt, EnvFilter};

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_SYNC_FALLBACK, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sgrid")]
#[command(about = "UK licensed sponsor register: ingest, search, serve")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    #[command(after_help = "\
Examples:
  sgrid serve
  sgrid serve --port 9000
  SPONSORGRID_DATA_DIR=./data sgrid serve --config sponsorgrid.toml")]
    Serve {
        /// Settings file (default: $SPONSORGRID_CONFIG, then the user config dir)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Port to listen on, overriding settings
        #[arg(long)]
        port: Option<u16>,
    },

    /// Fetch and parse the register once, reporting what was ingested
    #[command(after_help = "\
Examples:
  sgrid sync
  sgrid sync --file register.csv --json
  sgrid sync --strict || echo 'live register unavailable'")]
    Sync {
        /// Read a local register export instead of downloading
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Settings file (used for the register URL when --file is absent)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Print a JSON report instead of a summary line
        #[arg(long)]
        json: bool,

        /// Exit 60 when the fallback dataset was used
        #[arg(long)]
        strict: bool,
    },

    /// Search sponsors and print one page of results as JSON
    #[command(after_help = "\
Examples:
  sgrid search --query nhs
  sgrid search --location london --page 2 --limit 5
  sgrid search --file register.csv --route 'Skilled Worker' --sort-by dateAdded --sort-order desc")]
    Search {
        /// Search a local register export instead of the built-in catalog
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Case-insensitive text over name, town, county and industry
        #[arg(long)]
        query: Option<String>,

        /// Exact sponsor type, e.g. "Worker"
        #[arg(long = "type", value_name = "TYPE")]
        sponsor_type: Option<String>,

        /// Exact route, e.g. "Skilled Worker"
        #[arg(long)]
        route: Option<String>,

        /// Case-insensitive text over town and county
        #[arg(long)]
        location: Option<String>,

        /// Case-insensitive text over industry
        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        page: Option<usize>,

        #[arg(long)]
        limit: Option<usize>,

        /// name | location | dateAdded
        #[arg(long)]
        sort_by: Option<String>,

        /// asc | desc
        #[arg(long)]
        sort_order: Option<String>,
    },

    /// Print aggregate statistics as JSON
    Stats {
        /// Summarise a local register export instead of the built-in catalog
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve { .. } => "info",
        _ => "warn",
    };
    init_logging(default_level);

    let result = match cli.command {
        Commands::Serve { config, port } => cmd_serve(config, port),
        Commands::Sync { file, config, json, strict } => cmd_sync(file, config, json, strict),
        Commands::Search {
            file,
            query,
            sponsor_type,
            route,
            location,
            industry,
            page,
            limit,
            sort_by,
            sort_order,
        } => {
            let mut params = Params::new();
            put(&mut params, "query", query);
            put(&mut params, "type", sponsor_type);
            put(&mut params, "route", route);
            put(&mut params, "location", location);
            put(&mut params, "industry", industry);
            put(&mut params, "page", page);
            put(&mut params, "limit", limit);
            put(&mut params, "sortBy", sort_by);
            put(&mut params, "sortOrder", sort_order);
            cmd_search(file, params)
        }
        Commands::Stats { file } => cmd_stats(file),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins
/// over `default_level`.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (tests) is harmless
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

fn put(params: &mut Params, key: &str, value: Option<impl ToString>) {
    if let Some(v) = value {
        params.insert(key.to_string(), v.to_string());
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Read { .. } => CliError::io(err.to_string()),
            ConfigError::Parse(_) | ConfigError::Invalid(_) => CliError::usage(err.to_string())
                .with_hint("check the settings file and SPONSORGRID_* environment variables"),
        }
    }
}

impl From<IngestError> for CliError {
    fn from(err: IngestError) -> Self {
        let hint = match &err {
            IngestError::MissingColumn { .. } => {
                Some("expected a Home Office register export with organisation and town columns")
            }
            _ => None,
        };
        let mut e = CliError::parse(err.to_string());
        e.hint = hint.map(str::to_string);
        e
    }
}

impl From<ServerError> for CliError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Bind { .. } => {
                CliError::io(err.to_string()).with_hint("is another process using this port? try --port")
            }
            other => CliError { code: EXIT_ERROR, message: other.to_string(), hint: None },
        }
    }
}

// ============================================================================
// serve
// ============================================================================

fn cmd_serve(config: Option<PathBuf>, port: Option<u16>) -> Result<(), CliError> {
    let mut settings = Settings::load(config.as_deref())?;
    if let Some(port) = port {
        settings.server.port = port;
        settings.validate()?;
    }

    // Outside the runtime: the register client spins up its own.
    let state = AppState::from_settings(settings)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io(format!("cannot start async runtime: {e}")))?;

    runtime.block_on(start_server(state))?;
    Ok(())
}

// ============================================================================
// sync
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncJson<'a> {
    source: &'static str,
    origin: String,
    record_count: usize,
    skipped_count: usize,
    skipped: &'a [SkippedRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<String>,
}

fn cmd_sync(file: Option<PathBuf>, config: Option<PathBuf>, json: bool, strict: bool) -> Result<(), CliError> {
    let source: Box<dyn CsvSource> = match file {
        Some(path) => Box::new(FileSource::new(path)),
        None => {
            let settings = Settings::load(config.as_deref())?;
            let register = &settings.register;
            let client = RegisterClient::new(register.csv_url.clone(), &register.user_agent, register.timeout())
                .map_err(|e| CliError::usage(e.to_string()))?;
            Box::new(client)
        }
    };

    let origin = source.describe();
    let outcome = ingest(source.as_ref(), &mut Normalizer::new(), Utc::now());
    let skipped: &[SkippedRow] = match &outcome {
        IngestOutcome::Live(report) => &report.skipped,
        IngestOutcome::Fallback { .. } => &[],
    };

    if json {
        let report = SyncJson {
            source: if outcome.is_fallback() { "fallback" } else { "live" },
            origin,
            record_count: outcome.sponsors().len(),
            skipped_count: skipped.len(),
            skipped,
            fallback_reason: outcome.fallback_reason().map(|r| r.to_string()),
        };
        print_json(&report)?;
    } else {
        match outcome.fallback_reason() {
            None => println!(
                "synced {} sponsors from {} ({} rows skipped)",
                outcome.sponsors().len(),
                origin,
                skipped.len()
            ),
            Some(reason) => {
                eprintln!("warning: {reason}");
                println!("using {} fallback sponsors", outcome.sponsors().len());
            }
        }
    }

    if strict {
        if let Some(reason) = outcome.fallback_reason() {
            return Err(CliError {
                code: EXIT_SYNC_FALLBACK,
                message: format!("live register unavailable: {reason}"),
                hint: None,
            });
        }
    }
    Ok(())
}

// ============================================================================
// search / stats
// ============================================================================

/// Sponsors from a register export, or the built-in catalog.
fn load_sponsors(file: Option<&Path>) -> Result<Vec<Sponsor>, CliError> {
    let Some(path) = file else {
        return mock_sponsors().map_err(|e| CliError::parse(format!("built-in catalog is invalid: {e}")));
    };

    let text = read_register_file(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    let report = parse_register_csv(&text, &mut Normalizer::new(), Utc::now())?;
    for row in &report.skipped {
        tracing::debug!(line = row.line, reason = %row.reason, "skipped row");
    }
    if !report.skipped.is_empty() {
        tracing::warn!(count = report.skipped.len(), "rows skipped");
    }
    Ok(report.sponsors)
}

fn cmd_search(file: Option<PathBuf>, params: Params) -> Result<(), CliError> {
    let sponsors = load_sponsors(file.as_deref())?;
    let filters = SearchFilters::from_params(&params);
    print_json(&search(&sponsors, &filters))
}

fn cmd_stats(file: Option<PathBuf>) -> Result<(), CliError> {
    let sponsors = load_sponsors(file.as_deref())?;
    print_json(&compute_stats(&sponsors, Utc::now()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: format!("cannot serialize output: {e}"), hint: None })?;
    println!("{out}");
    Ok(())
}
