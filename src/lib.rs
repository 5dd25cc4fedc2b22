//! `sovereign-quotes` library crate.
//!
//! The binary (`sq`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes or touching the network
//! - the quote service can be embedded behind another boundary (HTTP, scheduler)

pub mod app;
pub mod cache;
pub mod chain;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod extract;
pub mod horizon;
pub mod report;
