//! WHOIS evidence collector.
//!
//! Fetches free-text registration data and scans it for availability
//! phrases. Absence of such a phrase does not prove registration;
//! `likely_available = false` means "taken or unknown". Any transport
//! failure degrades to a failed evidence value, never an error.

use std::time::Duration;

use tracing::debug;
use whois_rust::{WhoIs, WhoIsLookupOptions};

use crate::evidence::WhoisEvidence;
use crate::rate_limit::RateLimitContext;

/// Case-insensitive substrings that mark a domain as likely unregistered.
/// Phrasing varies wildly across registries; this list covers the common
/// gTLD and ccTLD registries.
const AVAILABILITY_PHRASES: &[&str] = &[
    "no match for",
    "not found",
    "no data found",
    "no entries found",
    "no object found",
    "status: free",
    "status: available",
    "domain not found",
    "available for registration",
    "is free",
    "no information available",
];

const WHOIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimal registry server map; `whois.iana.org` referral covers the rest.
const SERVER_MAP: &str = r#"{
    "com": "whois.verisign-grs.com",
    "net": "whois.verisign-grs.com",
    "org": "whois.pir.org",
    "io": "whois.nic.io",
    "co": "whois.nic.co",
    "app": "whois.nic.google",
    "dev": "whois.nic.google",
    "ai": "whois.nic.ai",
    "id": "whois.id",
    "": "whois.iana.org",
    "_": {
        "ip": {
            "host": "whois.arin.net",
            "query": "n + $addr\r\n"
        }
    }
}"#;

/// Look up WHOIS data for a domain and classify availability.
pub async fn lookup(domain: &str, rate_limit_ctx: Option<&RateLimitContext>) -> WhoisEvidence {
    if let Some(ctx) = rate_limit_ctx {
        ctx.whois_limiter.acquire().await;
    }

    match fetch_raw(domain).await {
        Ok(raw) => {
            let likely_available = contains_availability_phrase(&raw);
            debug!(
                "WHOIS for {}: likely_available={}",
                domain, likely_available
            );
            WhoisEvidence {
                ok: true,
                likely_available,
                error: None,
            }
        }
        Err(e) => {
            debug!("WHOIS lookup failed for {}: {}", domain, e);
            WhoisEvidence::failed(e.to_string())
        }
    }
}

/// Whether raw WHOIS text contains any availability phrase.
pub fn contains_availability_phrase(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    AVAILABILITY_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

async fn fetch_raw(domain: &str) -> anyhow::Result<String> {
    let whois = WhoIs::from_string(SERVER_MAP)
        .map_err(|e| anyhow::anyhow!("failed to create WHOIS client: {}", e))?;
    let options = WhoIsLookupOptions::from_string(domain)
        .map_err(|e| anyhow::anyhow!("invalid domain for WHOIS lookup: {}", e))?;

    // whois-rust is blocking; run it off the async runtime with a timeout
    match tokio::time::timeout(
        WHOIS_TIMEOUT,
        tokio::task::spawn_blocking(move || whois.lookup(options)),
    )
    .await
    {
        Ok(Ok(Ok(raw))) => Ok(raw),
        Ok(Ok(Err(e))) => Err(anyhow::anyhow!("whois lookup failed: {}", e)),
        Ok(Err(_)) => Err(anyhow::anyhow!("whois lookup task panicked")),
        Err(_) => Err(anyhow::anyhow!("whois lookup timed out")),
    }
}
