//! Runtime settings from the environment (and an optional `.env`).

use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::chain::{ChainConfig, MIN_TRUSTED_TENORS};
use crate::data::fetch::MAX_ATTEMPTS;
use crate::error::AppError;

const ENV_CACHE_TTL: &str = "SQ_CACHE_TTL_SECS";
const ENV_HTTP_TIMEOUT: &str = "SQ_HTTP_TIMEOUT_SECS";
const ENV_HTTP_ATTEMPTS: &str = "SQ_HTTP_ATTEMPTS";
const ENV_CHAIN_BUDGET: &str = "SQ_CHAIN_BUDGET_SECS";
const ENV_MIN_TENORS: &str = "SQ_MIN_TENORS";
const ENV_OFFLINE: &str = "SQ_OFFLINE";

#[derive(Debug, Clone)]
pub struct Settings {
    pub cache_ttl: Duration,
    pub http_attempts: u32,
    pub chain: ChainConfig,
    /// Never touch the network; every answer is the demo fallback.
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_TTL,
            http_attempts: 1,
            chain: ChainConfig::default(),
            offline: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Settings::default();

        if let Some(secs) = parse_u64(&lookup, ENV_CACHE_TTL)? {
            settings.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_u64(&lookup, ENV_HTTP_TIMEOUT)? {
            if secs == 0 {
                return Err(AppError::new(2, format!("{ENV_HTTP_TIMEOUT} must be > 0.")));
            }
            settings.chain.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = parse_u64(&lookup, ENV_HTTP_ATTEMPTS)? {
            if n == 0 || n > u64::from(MAX_ATTEMPTS) {
                return Err(AppError::new(
                    2,
                    format!("{ENV_HTTP_ATTEMPTS} must be between 1 and {MAX_ATTEMPTS}."),
                ));
            }
            settings.http_attempts = n as u32;
        }
        if let Some(secs) = parse_u64(&lookup, ENV_CHAIN_BUDGET)? {
            settings.chain.budget = Duration::from_secs(secs);
        }
        if let Some(n) = parse_u64(&lookup, ENV_MIN_TENORS)? {
            // Lower values are raised to the floor rather than rejected.
            settings.chain.min_tenors = (n as usize).max(MIN_TRUSTED_TENORS);
        }
        if let Some(raw) = lookup(ENV_OFFLINE) {
            settings.offline = parse_bool(ENV_OFFLINE, &raw)?;
        }

        Ok(settings)
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| AppError::new(2, format!("Invalid {key}: '{raw}' is not a non-negative integer.")))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::new(2, format!("Invalid {key}: '{raw}' is not a boolean."))),
    }
}
