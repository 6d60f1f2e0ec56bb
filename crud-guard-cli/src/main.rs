//! crud-guard command-line checker
//!
//! Validates a JSON CRUD query against the allow-list in a TOML config:
//!
//!   crud-guard --config guard.toml query.json
//!   cat query.json | crud-guard --config guard.toml
//!
//! Exit status: 0 accepted, 1 rejected (403 or 400), 2 usage or I/O error.
//! Log verbosity follows `CRUD_GUARD_LOG` (e.g. `CRUD_GUARD_LOG=debug`).

use anyhow::{Context, Result};
use clap::Parser;
use crud_guard::{CrudGuard, CrudQuery, GuardConfig, GuardError};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CRUD_GUARD_LOG";

#[derive(Parser, Debug)]
#[command(name = "crud-guard")]
#[command(version, about = "Check a CRUD query against a relation allow-list")]
struct Args {
    /// Path to the guard configuration (TOML)
    #[arg(short, long, default_value = "crud-guard.toml")]
    config: PathBuf,

    /// Query file (JSON); read from stdin when omitted
    query: Option<PathBuf>,

    /// Log every accepted leaf path
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(Ok(query)) => {
            println!(
                "accepted: {} join(s), {} sort expression(s)",
                query.joins.len(),
                query.sort_expressions().len()
            );
            ExitCode::SUCCESS
        },
        Ok(Err(rejection)) => {
            eprintln!("{} {rejection}", rejection.status_code());
            ExitCode::from(1)
        },
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        },
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<Result<CrudQuery, GuardError>> {
    let config = GuardConfig::load(&args.config)?;
    let guard = CrudGuard::from_config(&config)?;
    tracing::debug!(joins = guard.allowed().len(), "loaded guard config");

    let source = match &args.query {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read query {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read query from stdin")?;
            buf
        },
    };
    evaluate(&guard, &source)
}

/// Decode `source` and run every check. The outer error is for input that
/// is not JSON at all; the inner one is the guard's verdict.
fn evaluate(guard: &CrudGuard, source: &str) -> Result<Result<CrudQuery, GuardError>> {
    let value: Value = serde_json::from_str(source).context("query is not valid JSON")?;
    Ok(guard.check(&value))
}
