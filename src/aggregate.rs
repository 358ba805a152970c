//! Record filtering, deduplication, and post-dedup enrichment.
//!
//! Probe-origin records arrive already enriched; search-origin records are
//! enriched once here, after deduplication, so a collector is never invoked
//! twice for the same surviving identity.

use tracing::debug;

use crate::config::AppConfig;
use crate::crt::CrtClient;
use crate::dns::DnsServerPool;
use crate::rate_limit::RateLimitContext;
use crate::record::{MatchType, Record};
use crate::{dns, whois};

/// Drop records the run policy excludes. Under strict mode only the three
/// exact match types survive; otherwise everything but mentions, and
/// mentions too when explicitly allowed.
pub fn filter_records(records: Vec<Record>, strict: bool, allow_mentions: bool) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| match r.match_type {
            MatchType::ExactDomain | MatchType::SocialExact | MatchType::OrgTitleExact => true,
            MatchType::Mention => !strict && allow_mentions,
            _ => !strict,
        })
        .collect()
}

/// Sort by score descending, then keep the first record per dedup key.
/// The sort is stable, so among equal scores insertion order decides.
pub fn dedup_records(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    let mut seen = std::collections::HashSet::new();
    records.retain(|r| seen.insert(r.dedup_key()));
    records
}

/// Enrich surviving records that have not been through the probe path.
/// Each collector runs at most once per record and failures stay local
/// to the evidence field they would have filled.
pub async fn enrich_survivors(
    records: &mut [Record],
    config: &AppConfig,
    dns_pool: &DnsServerPool,
    crt_client: &CrtClient,
    rate_limit_ctx: &RateLimitContext,
) {
    for record in records.iter_mut() {
        if record.is_enriched() {
            continue;
        }
        let Some(domain) = record.domain.clone().or_else(|| record.hostname.clone()) else {
            continue;
        };

        debug!("enriching search record for {}", domain);
        record.dns = Some(dns::resolve(&domain, dns_pool, Some(rate_limit_ctx)).await);
        if config.pipeline.whois_enabled {
            record.whois = Some(whois::lookup(&domain, Some(rate_limit_ctx)).await);
        }
        if config.pipeline.crt_enabled {
            record.crt = Some(crt_client.query(&domain, Some(rate_limit_ctx)).await);
        }

        tokio::time::sleep(rate_limit_ctx.enrichment_stagger).await;
    }
}
