//! Bing web results scraper (no API key required).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

use super::SearchProvider;

const BING_URL: &str = "https://www.bing.com/search";

pub struct BingProvider {
    client: reqwest::Client,
    base_url: String,
}

impl BingProvider {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        Self::with_base_url(user_agent, timeout, BING_URL.to_string())
    }

    pub fn with_base_url(user_agent: &str, timeout: Duration, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, base_url }
    }
}

/// Result links live under `li.b_algo h2 a`. Bing tracking redirects
/// (`bing.com/ck/a`) are dropped rather than resolved.
pub fn parse_results(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("li.b_algo h2 a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut urls = Vec::new();
    for link in document.select(&selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") || href.contains("bing.com/ck/") {
            continue;
        }
        urls.push(href.to_string());
        if urls.len() >= max_results {
            break;
        }
    }
    urls
}

#[async_trait]
impl SearchProvider for BingProvider {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await
            .context("bing request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("bing returned HTTP {}", response.status());
        }

        let html = response.text().await.context("bing response body")?;
        Ok(parse_results(&html, max_results))
    }
}
