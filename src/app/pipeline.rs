//! The quote pipeline shared by every CLI command.
//!
//! request -> cache lookup -> (miss) provider chain -> (exhausted) demo
//! fallback -> cache store -> record stamped with this call's provenance.
//!
//! `get` never fails. Upstream trouble, including a panic inside an
//! extractor, ends in a demo-tagged record. That record is cached like a live
//! one, so an outage costs one chain run per key per freshness window.

use std::panic::{AssertUnwindSafe, catch_unwind};

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::cache::QuoteCache;
use crate::chain::{ChainConfig, ChainDiagnostics, ProviderChain};
use crate::config::Settings;
use crate::data::{DocumentFetcher, demo_quote, providers_for};
use crate::domain::{Provenance, QueryKey, Quote};

/// A resolved record plus the chain attempts that produced it.
///
/// `diagnostics` is `None` when the chain did not run (cache hit or offline).
#[derive(Debug, Clone)]
pub struct Resolved {
    pub quote: Quote,
    pub diagnostics: Option<ChainDiagnostics>,
}

pub struct QuoteService<F, C> {
    fetcher: F,
    cache: C,
    chain: ChainConfig,
    offline: bool,
}

impl<F: DocumentFetcher, C: QuoteCache> QuoteService<F, C> {
    pub fn new(fetcher: F, cache: C, settings: &Settings) -> Self {
        Self {
            fetcher,
            cache,
            chain: settings.chain.clone(),
            offline: settings.offline,
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn get(&self, key: QueryKey) -> Quote {
        self.get_with_diagnostics(key).quote
    }

    pub fn get_with_diagnostics(&self, key: QueryKey) -> Resolved {
        self.resolve(key, Utc::now().date_naive())
    }

    /// Resolve independent requests in parallel; output order follows `keys`.
    pub fn get_many(&self, keys: &[QueryKey]) -> Vec<Quote> {
        keys.par_iter().map(|key| self.get(*key)).collect()
    }

    /// Full resolution with an explicit calendar date for stamping and
    /// provider URL selection.
    pub fn resolve(&self, key: QueryKey, today: NaiveDate) -> Resolved {
        if let Some(entry) = self.cache.get(&key) {
            info!(%key, as_of = %entry.payload.as_of(), stored_at = %entry.stored_at, "cache hit");
            return Resolved {
                quote: entry.payload.with_provenance(Provenance::Cache),
                diagnostics: None,
            };
        }

        if self.offline {
            return Resolved {
                quote: demo_quote(key.kind, key.country, today),
                diagnostics: None,
            };
        }

        let providers = providers_for(key.kind, key.country, today);
        let chain = ProviderChain::new(&self.fetcher, &self.chain);
        let outcome = match catch_unwind(AssertUnwindSafe(|| chain.run(key, &providers, today))) {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(%key, "provider chain panicked, serving demo data");
                return self.store(key, demo_quote(key.kind, key.country, today), None);
            }
        };

        match outcome.quote {
            Some(quote) => self.store(key, quote.with_provenance(Provenance::Live), Some(outcome.diagnostics)),
            None => {
                warn!(%key, "serving demo data");
                self.store(key, demo_quote(key.kind, key.country, today), Some(outcome.diagnostics))
            }
        }
    }

    fn store(&self, key: QueryKey, quote: Quote, diagnostics: Option<ChainDiagnostics>) -> Resolved {
        self.cache.put(key, quote.clone());
        Resolved { quote, diagnostics }
    }
}
