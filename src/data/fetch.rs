//! Outbound document retrieval.
//!
//! The chain only ever sees the `DocumentFetcher` trait, so tests drive it with
//! canned bodies and the binary drives it with `HttpFetcher`.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use tracing::debug;

use crate::error::{AppError, FetchError};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,text/csv;q=0.9,*/*;q=0.8";
const BROWSER_LANGUAGE: &str = "en-US,en;q=0.9,de;q=0.8";
const BROWSER_REFERER: &str = "https://www.google.com/";

/// Upper bound on attempts per fetch, whatever the configuration says.
pub const MAX_ATTEMPTS: u32 = 5;

/// `fetch(url) -> text | TransportError`.
pub trait DocumentFetcher: Send + Sync {
    /// Retrieve the full body of `url` within `timeout`.
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Blocking HTTP GET with browser-like headers.
///
/// `timeout` bounds the whole call, retries included: each attempt gets what
/// is left of it, and reqwest drops the connection when that expires.
pub struct HttpFetcher {
    client: Client,
    attempts: u32,
}

impl HttpFetcher {
    pub fn new(attempts: u32) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_LANGUAGE));
        headers.insert(REFERER, HeaderValue::from_static(BROWSER_REFERER));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            attempts: attempts.clamp(1, MAX_ATTEMPTS),
        })
    }

    fn fetch_once(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| classify(e, timeout))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body = resp.text().map_err(|e| classify(e, timeout))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}

impl DocumentFetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let deadline = Instant::now() + timeout;
        let mut attempt = 1;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(FetchError::Timeout(timeout));
            }
            match self.fetch_once(url, remaining) {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.attempts && e.is_retryable() => {
                    debug!(url, attempt, error = %e, "fetch failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn classify(err: reqwest::Error, timeout: Duration) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(timeout)
    } else if let Some(status) = err.status() {
        FetchError::Status {
            status: status.as_u16(),
        }
    } else {
        FetchError::Network(err.to_string())
    }
}

/// In-memory fetchers for exercising the chain without a network.
#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// URL → canned body or error. Unknown URLs fail with 404.
    #[derive(Default)]
    pub struct StaticFetcher {
        responses: HashMap<String, Result<String, FetchError>>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.responses.insert(url.into(), Ok(body.into()));
            self
        }

        pub fn with_error(mut self, url: impl Into<String>, err: FetchError) -> Self {
            self.responses.insert(url.into(), Err(err));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DocumentFetcher for StaticFetcher {
        fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(url)
                .cloned()
                .unwrap_or(Err(FetchError::Status { status: 404 }))
        }
    }
}
