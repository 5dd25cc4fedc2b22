//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - installs logging
//! - loads settings and applies CLI overrides
//! - wires the HTTP fetcher and in-memory cache into the quote pipeline
//! - prints JSON or tables

use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cache::MemoryCache;
use crate::cli::{AllArgs, Cli, Command, GetArgs, TableArgs};
use crate::config::Settings;
use crate::data::HttpFetcher;
use crate::domain::{Country, DataKind, Horizon, QueryKey};
use crate::error::AppError;

pub mod pipeline;

pub use pipeline::{QuoteService, Resolved};

type LiveService = QuoteService<HttpFetcher, MemoryCache>;

/// Entry point for the `sq` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging();

    let settings = settings_from_cli(Settings::from_env()?, &cli);

    match cli.command {
        Command::Get(args) => handle_get(&build_service(&settings)?, args),
        Command::All(args) => handle_all(&build_service(&settings)?, args),
        Command::Table(args) => handle_table(&build_service(&settings)?, args),
        Command::Providers => {
            print!("{}", crate::report::format_providers(Utc::now().date_naive()));
            Ok(())
        }
    }
}

/// Logs go to stderr; stdout carries only command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn settings_from_cli(mut settings: Settings, cli: &Cli) -> Settings {
    if cli.offline {
        settings.offline = true;
    }
    if let Some(secs) = cli.timeout_secs {
        settings.chain.fetch_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = cli.ttl_secs {
        settings.cache_ttl = Duration::from_secs(secs);
    }
    settings
}

fn build_service(settings: &Settings) -> Result<LiveService, AppError> {
    let fetcher = HttpFetcher::new(settings.http_attempts)?;
    let cache = MemoryCache::new(settings.cache_ttl);
    Ok(QuoteService::new(fetcher, cache, settings))
}

fn handle_get(service: &LiveService, args: GetArgs) -> Result<(), AppError> {
    let key = QueryKey::new(args.kind, args.country, args.horizon);
    let resolved = service.get_with_diagnostics(key);

    if args.explain {
        eprint!("{}", crate::report::format_diagnostics(key, resolved.diagnostics.as_ref()));
    }
    println!("{}", to_json(&resolved.quote, args.pretty)?);
    Ok(())
}

fn handle_all(service: &LiveService, args: AllArgs) -> Result<(), AppError> {
    let keys: Vec<QueryKey> = QueryKey::all()
        .into_iter()
        .filter(|k| args.kind.is_none_or(|kind| k.kind == kind))
        .filter(|k| args.horizon.is_none_or(|h| k.horizon == h))
        .collect();

    let quotes = service.get_many(&keys);
    println!("{}", to_json(&quotes, args.pretty)?);
    Ok(())
}

fn handle_table(service: &LiveService, args: TableArgs) -> Result<(), AppError> {
    let keys = table_keys(args.kind, args.horizon);
    let quotes = service.get_many(&keys);

    let table = match args.kind {
        DataKind::Yield => crate::report::format_yield_table(&quotes, args.horizon),
        DataKind::Cds => crate::report::format_cds_table(&quotes, args.horizon),
    };
    print!("{table}");
    Ok(())
}

fn table_keys(kind: DataKind, horizon: Horizon) -> Vec<QueryKey> {
    Country::ALL
        .into_iter()
        .map(|country| QueryKey::new(kind, country, horizon))
        .collect()
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, AppError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(|e| AppError::new(4, format!("Failed to serialize output: {e}")))
}
