//! Rate limiting for the external evidence sources.
//!
//! Token bucket limiters, one per source, shared across all in-flight
//! operations for a run. WHOIS and crt.sh are the rate-sensitive sources;
//! social probes are additionally serialized by the pipeline with an
//! inter-probe delay because anti-bot systems are the dominant failure mode.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::config::RateLimitConfig;

/// A token bucket limiter controlling one source's request rate.
#[derive(Debug)]
pub struct RateLimiter {
    tokens: f64,
    max_tokens: f64,
    refill_rate: f64,
    last_update: Instant,
    /// False when the configured rate is 0 (unlimited).
    enabled: bool,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        let enabled = requests_per_second > 0;
        let max_tokens = if enabled {
            requests_per_second as f64
        } else {
            f64::INFINITY
        };
        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate: requests_per_second as f64,
            last_update: Instant::now(),
            enabled,
        }
    }

    fn refill(&mut self) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_update = now;
    }

    /// Try to take a token; returns the wait duration when none is available.
    pub fn try_acquire(&mut self) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            None
        } else {
            let wait_secs = (1.0 - self.tokens) / self.refill_rate;
            Some(Duration::from_secs_f64(wait_secs))
        }
    }

    /// Take a token, sleeping until one is available. Re-checks after each
    /// sleep since other tasks may have consumed tokens meanwhile.
    pub async fn acquire(&mut self) {
        loop {
            match self.try_acquire() {
                None => return,
                Some(wait) => {
                    debug!("rate limiter waiting {:?} for token", wait);
                    sleep(wait).await;
                }
            }
        }
    }
}

/// Thread-safe wrapper shared across concurrent probes.
#[derive(Debug, Clone)]
pub struct SharedRateLimiter {
    inner: Arc<Mutex<RateLimiter>>,
}

impl SharedRateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiter::new(requests_per_second))),
        }
    }

    pub async fn acquire(&self) {
        let mut limiter = self.inner.lock().await;
        limiter.acquire().await;
    }

    pub async fn is_enabled(&self) -> bool {
        self.inner.lock().await.enabled
    }
}

/// Per-run rate limiting context, one limiter per external source.
#[derive(Debug, Clone)]
pub struct RateLimitContext {
    pub whois_limiter: SharedRateLimiter,
    pub dns_limiter: SharedRateLimiter,
    pub crt_limiter: SharedRateLimiter,
    pub search_limiter: SharedRateLimiter,
    /// Delay between consecutive social probes for a single name.
    pub social_probe_delay: Duration,
    /// Stagger between same-record WHOIS/CRT enrichment calls.
    pub enrichment_stagger: Duration,
}

impl RateLimitContext {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            whois_limiter: SharedRateLimiter::new(config.whois_queries_per_second),
            dns_limiter: SharedRateLimiter::new(config.dns_queries_per_second),
            crt_limiter: SharedRateLimiter::new(config.crt_queries_per_second),
            search_limiter: SharedRateLimiter::new(config.search_queries_per_second),
            social_probe_delay: Duration::from_millis(config.social_probe_delay_ms),
            enrichment_stagger: Duration::from_millis(config.enrichment_stagger_ms),
        }
    }

    pub fn log_config(&self) {
        debug!(
            "rate limiting: social probe delay {:?}, enrichment stagger {:?}",
            self.social_probe_delay, self.enrichment_stagger
        );
    }
}

impl Default for RateLimitContext {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
