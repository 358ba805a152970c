//! SerpApi-backed search (Google results via JSON API, requires an API key).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::SearchProvider;

const SERPAPI_URL: &str = "https://serpapi.com/search.json";

pub struct SerpApiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

impl SerpApiProvider {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::with_base_url(api_key, timeout, SERPAPI_URL.to_string())
    }

    pub fn with_base_url(api_key: String, timeout: Duration, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("num", &max_results.to_string()),
                ("api_key", &self.api_key),
            ])
            .send()
            .await
            .context("serpapi request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("serpapi returned HTTP {}", response.status());
        }

        let body: SerpApiResponse = response.json().await.context("serpapi response parse")?;
        Ok(body
            .organic_results
            .into_iter()
            .filter_map(|r| r.link)
            .take(max_results)
            .collect())
    }
}
