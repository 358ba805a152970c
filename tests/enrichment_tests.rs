//! Post-dedup enrichment: search-origin survivors gain evidence exactly
//! once, and records the probe path already enriched are left alone.

mod common;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nameclaim::aggregate::enrich_survivors;
use nameclaim::config::AppConfig;
use nameclaim::crt::CrtClient;
use nameclaim::dns::DnsServerPool;
use nameclaim::evidence::DnsEvidence;
use nameclaim::rate_limit::RateLimitContext;
use nameclaim::record::{MatchOrigin, MatchType, Record};

use common::mock_doh_server;

fn test_config() -> AppConfig {
    let mut config = AppConfig::default_config().unwrap();
    // WHOIS would hit real registries; the collectors under test here are
    // DNS and certificate transparency.
    config.pipeline.whois_enabled = false;
    config.pipeline.crt_enabled = true;
    config.rate_limit.enrichment_stagger_ms = 0;
    config
}

async fn crt_server_expecting_one_query() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"id": 1, "name_value": "linkpulse.com"}, {"id": 2, "name_value": "www.linkpulse.com"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn search_survivor_is_enriched_exactly_once() {
    let doh = mock_doh_server("linkpulse.com", vec!["93.184.216.34"]).await;
    let crt = crt_server_expecting_one_query().await;

    let config = test_config();
    let pool = DnsServerPool::with_test_urls(vec![doh.uri()]);
    let crt_client = CrtClient::with_base_url(crt.uri());
    let ctx = RateLimitContext::from_config(&config.rate_limit);

    let mut search_record = Record::new(
        "https://linkpulse.com/pricing",
        MatchType::ExactDomain,
        MatchOrigin::Search,
    );
    search_record.domain = Some("linkpulse.com".to_string());
    assert!(!search_record.is_enriched());

    let mut records = vec![search_record];
    enrich_survivors(&mut records, &config, &pool, &crt_client, &ctx).await;

    let enriched = &records[0];
    assert!(enriched.dns.as_ref().unwrap().resolves);
    assert_eq!(enriched.crt.as_ref().unwrap().entries, 2);
    assert!(enriched.whois.is_none());
    // The crt mock's expect(1) verifies the single query on drop.
}

#[tokio::test]
async fn already_enriched_record_is_skipped() {
    let doh = mock_doh_server("linkpulse.com", vec!["93.184.216.34"]).await;
    let crt = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&crt)
        .await;

    let config = test_config();
    let pool = DnsServerPool::with_test_urls(vec![doh.uri()]);
    let crt_client = CrtClient::with_base_url(crt.uri());
    let ctx = RateLimitContext::from_config(&config.rate_limit);

    // Probe-path record whose evidence disagrees with what the mocks would
    // return; re-enrichment would overwrite it.
    let mut probe_record = Record::new(
        "https://linkpulse.com",
        MatchType::ExactDomain,
        MatchOrigin::Probe,
    );
    probe_record.domain = Some("linkpulse.com".to_string());
    probe_record.dns = Some(DnsEvidence {
        resolves: false,
        error: None,
    });
    assert!(probe_record.is_enriched());

    let mut records = vec![probe_record];
    enrich_survivors(&mut records, &config, &pool, &crt_client, &ctx).await;

    assert!(!records[0].dns.as_ref().unwrap().resolves);
    assert!(records[0].crt.is_none());
    // The crt mock's expect(0) verifies no query was made.
}
