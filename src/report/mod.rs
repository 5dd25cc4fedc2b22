//! Terminal rendering of quotes, chain diagnostics and provider listings.

mod format;

pub use format::{format_cds_table, format_diagnostics, format_providers, format_yield_table};
