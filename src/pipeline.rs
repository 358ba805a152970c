//! Per-name orchestration: candidates, probes, search, social checks,
//! aggregation, provenance filtering.
//!
//! Domain probes and URL processing run under a bounded concurrency budget;
//! social probes run one at a time with an inter-probe delay since anti-bot
//! systems are the dominant failure mode there.

use std::time::Duration;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::aggregate;
use crate::classify;
use crate::config::{AppConfig, ProbeMode};
use crate::crt::CrtClient;
use crate::dns::DnsServerPool;
use crate::evidence::Presence;
use crate::fetch;
use crate::normalize::{build_candidate_domains, slug, split_domain, Candidate};
use crate::platforms::{Platform, ALL_PLATFORMS, CRITICAL_PLATFORMS};
use crate::provenance;
use crate::rate_limit::RateLimitContext;
use crate::record::{MatchOrigin, Record, UsageVerdict};
use crate::search::SearchChain;
use crate::social;
use crate::whois;
use crate::dns;

pub struct Pipeline {
    config: AppConfig,
    search_chain: SearchChain,
    dns_pool: DnsServerPool,
    crt_client: CrtClient,
    fetch_client: reqwest::Client,
    probe_client: reqwest::Client,
    rate_limit_ctx: RateLimitContext,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        let search_chain = SearchChain::from_config(&config);
        let dns_pool = DnsServerPool::from_config(&config);
        let crt_client = CrtClient::new(
            &config.http.user_agent,
            Duration::from_secs(config.http.request_timeout_secs),
        );
        let fetch_client = fetch::fetch_client(
            &config.http.user_agent,
            Duration::from_secs(config.http.fetch_timeout_secs),
        );
        let probe_client = social::probe_client(
            &config.http.user_agent,
            Duration::from_secs(config.http.probe_timeout_secs),
        )?;
        let rate_limit_ctx = RateLimitContext::from_config(&config.rate_limit);
        rate_limit_ctx.log_config();

        Ok(Self {
            config,
            search_chain,
            dns_pool,
            crt_client,
            fetch_client,
            probe_client,
            rate_limit_ctx,
        })
    }

    /// Run the full pipeline for one name. Individual source failures are
    /// absorbed by the collectors; this only errors on internal invariant
    /// violations, never on external ones.
    pub async fn run(&self, name: &str) -> Result<UsageVerdict> {
        info!("checking name {:?}", name);

        let mut records = self.probe_candidates(name).await;
        debug!("{} probe records for {:?}", records.len(), name);

        let search_records = self.search_and_classify(name).await;
        debug!("{} search records for {:?}", search_records.len(), name);
        records.extend(search_records);

        let social_records = self.probe_social(name, &records).await;
        debug!("{} social probe records for {:?}", social_records.len(), name);
        records.extend(social_records);

        let records = aggregate::filter_records(
            records,
            self.config.pipeline.strict,
            self.config.pipeline.allow_mentions,
        );
        let mut records = aggregate::dedup_records(records);

        aggregate::enrich_survivors(
            &mut records,
            &self.config,
            &self.dns_pool,
            &self.crt_client,
            &self.rate_limit_ctx,
        )
        .await;

        if self.config.pipeline.only_found {
            records.retain(provenance::has_usage_evidence);
        }

        info!("{} records survive for {:?}", records.len(), name);
        Ok(UsageVerdict::new(name, records))
    }

    /// Probe every candidate domain concurrently under the worker budget.
    /// Each candidate yields a record carrying whatever evidence the
    /// collectors produced, including evidence of availability.
    async fn probe_candidates(&self, name: &str) -> Vec<Record> {
        let tlds = self.config.tlds.all();
        let candidates = build_candidate_domains(name, &tlds);
        if candidates.is_empty() {
            warn!("name {:?} normalizes to an empty label, skipping domain probes", name);
            return Vec::new();
        }

        stream::iter(candidates)
            .map(|candidate| self.probe_candidate(name, candidate))
            .buffer_unordered(self.config.pipeline.concurrency.max(1))
            .collect::<Vec<_>>()
            .await
    }

    async fn probe_candidate(&self, name: &str, candidate: Candidate) -> Record {
        let url = format!("https://{}", candidate.domain);
        let classification = classify::classify(name, &url, None);

        let mut record = Record::new(&url, classification.match_type, MatchOrigin::Probe);
        record.domain = Some(candidate.domain.clone());
        record.hostname = Some(candidate.domain.clone());
        record.sld = Some(candidate.sld);
        record.tld = Some(candidate.tld);

        record.dns = Some(
            dns::resolve(&candidate.domain, &self.dns_pool, Some(&self.rate_limit_ctx)).await,
        );
        if self.config.pipeline.whois_enabled {
            record.whois =
                Some(whois::lookup(&candidate.domain, Some(&self.rate_limit_ctx)).await);
        }
        if self.config.pipeline.crt_enabled {
            record.crt = Some(
                self.crt_client
                    .query(&candidate.domain, Some(&self.rate_limit_ctx))
                    .await,
            );
        }

        record
    }

    /// Search for the name, fetch each hit, and classify it.
    async fn search_and_classify(&self, name: &str) -> Vec<Record> {
        if self.search_chain.is_empty() {
            return Vec::new();
        }

        let urls = self
            .search_chain
            .search(
                name,
                self.config.search.max_results,
                Some(&self.rate_limit_ctx),
            )
            .await;

        stream::iter(urls)
            .map(|url| async move { self.classify_url(name, url).await })
            .buffer_unordered(self.config.pipeline.concurrency.max(1))
            .filter_map(|r| async move { r })
            .collect::<Vec<_>>()
            .await
    }

    async fn classify_url(&self, name: &str, url: String) -> Option<Record> {
        let content = match fetch::fetch_page(&url, &self.fetch_client).await {
            Ok(content) => content,
            Err(e) => {
                debug!("fetch failed for {}: {}", url, e);
                fetch::PageContent::default()
            }
        };

        let classification = classify::classify(name, &url, content.title.as_deref());
        let mut record = Record::new(&url, classification.match_type, MatchOrigin::Search);
        record.title = content.title;
        record.snippet = content.snippet;

        if let Ok(parsed) = url::Url::parse(&url) {
            if let Some(host) = parsed.host_str() {
                let host = host.to_lowercase();
                if let Some((sld, tld)) = split_domain(&host) {
                    record.domain = Some(format!("{}.{}", sld, tld));
                    record.sld = Some(sld);
                    record.tld = Some(tld);
                }
                record.hostname = Some(host);
            }
        }
        if let Some((platform, username)) = classification.social {
            record.social_platform = Some(platform.name().to_string());
            record.social_username = Some(username);
        }

        Some(record)
    }

    /// Probe platform handles one at a time. `auto` mode only checks
    /// critical platforms with no search-found record; `always` checks the
    /// full platform table.
    async fn probe_social(&self, name: &str, existing: &[Record]) -> Vec<Record> {
        let username = slug(name);
        if username.is_empty() {
            return Vec::new();
        }

        let targets: Vec<Platform> = match self.config.pipeline.probe_mode {
            ProbeMode::Off => return Vec::new(),
            ProbeMode::Always => ALL_PLATFORMS.to_vec(),
            ProbeMode::Auto => CRITICAL_PLATFORMS
                .iter()
                .copied()
                .filter(|p| {
                    !existing
                        .iter()
                        .any(|r| r.social_platform.as_deref() == Some(p.name()))
                })
                .collect(),
        };

        let mut records = Vec::new();
        let mut first = true;
        for platform in targets {
            if !first {
                tokio::time::sleep(self.rate_limit_ctx.social_probe_delay).await;
            }
            first = false;

            let evidence = social::probe(platform, &username, &self.probe_client).await;
            debug!(
                "social probe {}/{}: {:?}",
                platform.name(),
                username,
                evidence.presence
            );

            // A verified-absent handle is free; it contributes nothing to
            // the record set. Present and Unknown outcomes are kept.
            if evidence.presence == Presence::Absent {
                continue;
            }

            let url = platform.profile_url(&username);
            let classification = classify::classify(name, &url, None);
            let mut record = Record::new(&url, classification.match_type, MatchOrigin::SocialProbe);
            record.social_platform = Some(platform.name().to_string());
            record.social_username = Some(username.clone());
            record.social_probe = Some(evidence);
            records.push(record);
        }
        records
    }
}
