//! Search provider contract and the priority chain.
//!
//! `search(query, max_results)` returns a capped, ordered list of URLs,
//! best-effort. Providers are interchangeable; the chain tries them in the
//! configured priority order until one yields results.

mod bing;
mod duckduckgo;
mod serpapi;

pub use bing::BingProvider;
pub use duckduckgo::DuckDuckGoProvider;
pub use serpapi::SerpApiProvider;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::rate_limit::RateLimitContext;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Best-effort search; may return an empty list.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>>;
}

/// Providers tried in priority order until one returns results.
pub struct SearchChain {
    providers: Vec<Box<dyn SearchProvider>>,
}

impl SearchChain {
    pub fn new(providers: Vec<Box<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// Build the chain from configuration. Unknown names are rejected at
    /// config validation; a missing SerpApi key just skips that provider.
    pub fn from_config(config: &AppConfig) -> Self {
        let user_agent = config.http.user_agent.clone();
        let timeout = Duration::from_secs(config.http.request_timeout_secs);

        let mut providers: Vec<Box<dyn SearchProvider>> = Vec::new();
        for name in &config.search.providers {
            match name.as_str() {
                "serpapi" => {
                    if let Some(key) = config.serpapi_key() {
                        providers.push(Box::new(SerpApiProvider::new(key, timeout)));
                    } else {
                        debug!("serpapi provider configured but no API key present, skipping");
                    }
                }
                "duckduckgo" => {
                    providers.push(Box::new(DuckDuckGoProvider::new(&user_agent, timeout)))
                }
                "bing" => providers.push(Box::new(BingProvider::new(&user_agent, timeout))),
                other => debug!("ignoring unknown search provider {}", other),
            }
        }
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run the chain: first provider with a non-empty result wins.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        rate_limit_ctx: Option<&RateLimitContext>,
    ) -> Vec<String> {
        for provider in &self.providers {
            if let Some(ctx) = rate_limit_ctx {
                ctx.search_limiter.acquire().await;
            }
            match provider.search(query, max_results).await {
                Ok(urls) if !urls.is_empty() => {
                    debug!(
                        "search provider {} returned {} urls for {:?}",
                        provider.name(),
                        urls.len(),
                        query
                    );
                    return urls;
                }
                Ok(_) => {
                    debug!("search provider {} returned no results, trying next", provider.name());
                }
                Err(e) => {
                    warn!("search provider {} failed: {}, trying next", provider.name(), e);
                }
            }
        }
        Vec::new()
    }
}
