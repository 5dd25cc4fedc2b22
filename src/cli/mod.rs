//! Command-line parsing for the sovereign quote fetcher.
//!
//! Validation of type, country and horizon happens here, through `ValueEnum`,
//! so the pipeline only ever sees supported values.

use clap::{Args, Parser, Subcommand};

use crate::domain::{Country, DataKind, Horizon};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sq",
    version,
    about = "Sovereign yield curves and 5Y CDS spreads, live with demo fallback"
)]
pub struct Cli {
    /// Skip the network and serve demo data.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Per-fetch timeout in seconds (overrides SQ_HTTP_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Cache freshness window in seconds (overrides SQ_CACHE_TTL_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub ttl_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one (type, country, horizon) and print it as JSON.
    Get(GetArgs),
    /// Resolve every supported combination in parallel and print a JSON array.
    All(AllArgs),
    /// Print a fixed-width table for one type across all countries.
    Table(TableArgs),
    /// List the configured provider chains.
    Providers,
}

#[derive(Debug, Args, Clone)]
pub struct GetArgs {
    /// Data type.
    #[arg(long = "type", value_enum)]
    pub kind: DataKind,

    /// Country code (case-insensitive).
    #[arg(short = 'c', long, value_enum, ignore_case = true)]
    pub country: Country,

    /// How far back to look.
    #[arg(long, value_enum, default_value_t = Horizon::Today)]
    pub horizon: Horizon,

    /// Pretty-print the JSON record.
    #[arg(long)]
    pub pretty: bool,

    /// Print the provider attempts to stderr.
    #[arg(long)]
    pub explain: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AllArgs {
    /// Restrict to one data type.
    #[arg(long = "type", value_enum)]
    pub kind: Option<DataKind>,

    /// Restrict to one horizon.
    #[arg(long, value_enum)]
    pub horizon: Option<Horizon>,

    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[arg(long = "type", value_enum, default_value_t = DataKind::Yield)]
    pub kind: DataKind,

    #[arg(long, value_enum, default_value_t = Horizon::Today)]
    pub horizon: Horizon,
}
