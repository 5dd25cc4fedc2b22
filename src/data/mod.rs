//! Upstream data: how documents are fetched, which sources are tried per
//! (type, country), and what is served when none of them can be trusted.

pub mod demo;
pub mod fetch;
pub mod providers;

pub use demo::demo_quote;
pub use fetch::{DocumentFetcher, HttpFetcher};
pub use providers::{ProviderKind, ProviderSpec, providers_for};
