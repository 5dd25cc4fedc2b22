//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - request enums (`Country`, `DataKind`, `Horizon`) and the cache key (`QueryKey`)
//! - the closed tenor enumeration and its positional rate container (`Tenor`, `TenorRates`)
//! - response records (`YieldCurve`, `CdsQuote`, `Quote`) and their `Provenance` tag

pub mod types;

pub use types::*;
