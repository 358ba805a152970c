//! Certificate Transparency evidence collector.
//!
//! Queries crt.sh with a wildcard-prefixed domain pattern. Only the entry
//! count matters for scoring. Empty bodies, "no results" phrases, and
//! malformed JSON are all neutral zero-entry outcomes; only an HTTP error
//! status is recorded as a failed lookup.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::evidence::CrtEvidence;
use crate::rate_limit::RateLimitContext;

const CRT_SH_BASE: &str = "https://crt.sh";

/// One crt.sh log entry. Most fields are unused; the count drives scoring.
#[derive(Debug, Deserialize)]
pub struct CrtShEntry {
    pub id: i64,
    #[serde(default)]
    pub issuer_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub name_value: Option<String>,
}

/// crt.sh client with an injectable base URL for tests.
pub struct CrtClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl CrtClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: CRT_SH_BASE.to_string(),
            timeout,
        }
    }

    /// Client pointed at a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let timeout = Duration::from_secs(10);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("nameclaim-test/0.3")
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    /// Query certificates for `%.domain` and count the entries.
    pub async fn query(
        &self,
        domain: &str,
        rate_limit_ctx: Option<&RateLimitContext>,
    ) -> CrtEvidence {
        if let Some(ctx) = rate_limit_ctx {
            ctx.crt_limiter.acquire().await;
        }

        let url = format!(
            "{}/?q=%.{}&output=json",
            self.base_url,
            urlencoding::encode(domain)
        );
        debug!("querying crt.sh: {}", url);

        let response = match self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                debug!("crt.sh request failed for {}: {}", domain, e);
                return CrtEvidence::failed(e.to_string());
            }
        };

        if !response.status().is_success() {
            warn!("crt.sh returned status {} for {}", response.status(), domain);
            return CrtEvidence::failed(format!("crt.sh status {}", response.status()));
        }

        let text = match response.text().await {
            Ok(t) => t,
            Err(e) => return CrtEvidence::failed(e.to_string()),
        };

        // Empty body / "no results" phrasing is a legitimate zero, not an error
        let trimmed = text.trim();
        if trimmed.is_empty()
            || trimmed == "[]"
            || trimmed.to_lowercase().contains("no results found")
        {
            return CrtEvidence::empty();
        }

        match serde_json::from_str::<Vec<CrtShEntry>>(trimmed) {
            Ok(entries) => {
                debug!("crt.sh found {} entries for {}", entries.len(), domain);
                CrtEvidence {
                    ok: true,
                    entries: entries.len(),
                    error: None,
                }
            }
            Err(e) => {
                // crt.sh serves malformed payloads under load; neutral zero
                warn!("failed to parse crt.sh response for {}: {}", domain, e);
                CrtEvidence::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_failure_is_recorded_as_error() {
        let client = CrtClient::with_base_url("http://127.0.0.1:1");
        let evidence = client.query("linkpulse.com", None).await;
        assert!(!evidence.ok);
        assert_eq!(evidence.entries, 0);
        assert!(evidence.error.is_some());
    }
}
