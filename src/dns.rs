//! DNS evidence collector.
//!
//! Resolves A records, falling back to AAAA; `resolves = true` when either
//! yields at least one address. DNS-over-HTTPS is the primary method with a
//! rotating server pool, and the system resolver via hickory is the final
//! fallback. Transport failure and "no records" both produce
//! `resolves = false`; the error field is the only distinction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hickory_resolver::TokioAsyncResolver;
use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;
use crate::evidence::DnsEvidence;
use crate::rate_limit::RateLimitContext;

#[derive(Debug, Clone)]
struct DohServer {
    url: String,
    name: String,
    timeout_secs: u64,
}

/// Rotating DNS-over-HTTPS server pool.
pub struct DnsServerPool {
    doh_servers: Vec<DohServer>,
    current_index: AtomicUsize,
    client: reqwest::Client,
    /// Skip the hickory system-resolver fallback (used by tests).
    system_fallback: bool,
}

impl DnsServerPool {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .user_agent(&config.http.user_agent)
            .build()
            .unwrap_or_default();

        Self {
            doh_servers: Self::default_servers(),
            current_index: AtomicUsize::new(0),
            client,
            system_fallback: true,
        }
    }

    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("nameclaim/0.3")
            .build()
            .unwrap_or_default();

        Self {
            doh_servers: Self::default_servers(),
            current_index: AtomicUsize::new(0),
            client,
            system_fallback: true,
        }
    }

    fn default_servers() -> Vec<DohServer> {
        vec![
            DohServer {
                url: "https://cloudflare-dns.com/dns-query".to_string(),
                name: "Cloudflare DoH".to_string(),
                timeout_secs: 3,
            },
            DohServer {
                url: "https://dns.google/resolve".to_string(),
                name: "Google DoH".to_string(),
                timeout_secs: 3,
            },
            DohServer {
                url: "https://dns.quad9.net/dns-query".to_string(),
                name: "Quad9 DoH".to_string(),
                timeout_secs: 4,
            },
        ]
    }

    /// Pool with custom DoH endpoints and no system fallback, for tests that
    /// point at a wiremock server.
    pub fn with_test_urls(urls: Vec<String>) -> Self {
        let doh_servers = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| DohServer {
                url,
                name: format!("Test DoH {}", i + 1),
                timeout_secs: 5,
            })
            .collect();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("nameclaim-test/0.3")
            .build()
            .unwrap_or_default();

        Self {
            doh_servers,
            current_index: AtomicUsize::new(0),
            client,
            system_fallback: false,
        }
    }

    fn next_server(&self) -> &DohServer {
        let index = self.current_index.fetch_add(1, Ordering::Relaxed) % self.doh_servers.len();
        &self.doh_servers[index]
    }

    /// Query one DoH server for records of the given type (1 = A, 28 = AAAA).
    async fn doh_lookup(
        &self,
        domain: &str,
        record_type: u16,
        server: &DohServer,
    ) -> anyhow::Result<Vec<String>> {
        let type_name = if record_type == 28 { "AAAA" } else { "A" };
        debug!("DoH {} lookup for {} via {}", type_name, domain, server.name);

        let response = self
            .client
            .get(&server.url)
            .query(&[("name", domain), ("type", type_name)])
            .header("Accept", "application/dns-json")
            .timeout(Duration::from_secs(server.timeout_secs))
            .send()
            .await?
            .json::<Value>()
            .await?;

        let mut addresses = Vec::new();
        if let Some(answers) = response["Answer"].as_array() {
            for answer in answers {
                if answer["type"].as_u64() == Some(record_type as u64) {
                    if let Some(data) = answer["data"].as_str() {
                        addresses.push(data.to_string());
                    }
                }
            }
        }
        Ok(addresses)
    }
}

impl Default for DnsServerPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a domain, preferring A records and falling back to AAAA.
/// Never fails: every failure path degrades to `resolves = false`.
pub async fn resolve(
    domain: &str,
    pool: &DnsServerPool,
    rate_limit_ctx: Option<&RateLimitContext>,
) -> DnsEvidence {
    if let Some(ctx) = rate_limit_ctx {
        ctx.dns_limiter.acquire().await;
    }

    let mut last_error: Option<String> = None;

    for record_type in [1u16, 28u16] {
        for _attempt in 0..2 {
            let server = pool.next_server();
            match pool.doh_lookup(domain, record_type, server).await {
                Ok(addresses) if !addresses.is_empty() => {
                    debug!(
                        "{} resolves via {} ({} addresses)",
                        domain,
                        server.name,
                        addresses.len()
                    );
                    return DnsEvidence {
                        resolves: true,
                        error: None,
                    };
                }
                Ok(_) => {
                    // NXDOMAIN / empty answer is a successful negative
                }
                Err(e) => {
                    debug!("DoH lookup failed for {} via {}: {}", domain, server.name, e);
                    last_error = Some(e.to_string());
                }
            }
        }
    }

    // Final fallback: system resolver. Only reached when DoH produced no
    // positive answer.
    if pool.system_fallback {
        match try_system_resolver(domain).await {
            Ok(true) => {
                return DnsEvidence {
                    resolves: true,
                    error: None,
                }
            }
            Ok(false) => {
                return DnsEvidence {
                    resolves: false,
                    error: None,
                }
            }
            Err(e) => {
                debug!("system resolver failed for {}: {}", domain, e);
                last_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    DnsEvidence {
        resolves: false,
        error: last_error,
    }
}

async fn try_system_resolver(domain: &str) -> anyhow::Result<bool> {
    use hickory_resolver::error::ResolveErrorKind;

    let resolver = TokioAsyncResolver::tokio_from_system_conf()?;
    match resolver.lookup_ip(domain).await {
        Ok(lookup) => Ok(lookup.iter().next().is_some()),
        Err(e) => match e.kind() {
            ResolveErrorKind::NoRecordsFound { .. } => Ok(false),
            _ => Err(e.into()),
        },
    }
}
