//! DuckDuckGo HTML endpoint scraper (no API key required).
//!
//! Result links come back as redirect URLs of the form
//! `//duckduckgo.com/l/?uddg=<encoded-target>`; the real target is recovered
//! from the `uddg` query parameter.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};

use super::SearchProvider;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoProvider {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        Self::with_base_url(user_agent, timeout, DDG_HTML_URL.to_string())
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

/// Extract result URLs from the HTML endpoint's markup, decoding the
/// `uddg` redirect wrapper where present.
pub fn parse_results(html: &str, max_results: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a.result__a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut urls = Vec::new();
    for link in document.select(&selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if let Some(target) = decode_redirect(href) {
            urls.push(target);
        } else if href.starts_with("http") {
            urls.push(href.to_string());
        }
        if urls.len() >= max_results {
            break;
        }
    }
    urls
}

fn decode_redirect(href: &str) -> Option<String> {
    let query = href.split("uddg=").nth(1)?;
    let encoded = query.split('&').next()?;
    let decoded = urlencoding::decode(encoded).ok()?;
    if decoded.starts_with("http") {
        Some(decoded.into_owned())
    } else {
        None
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await
            .context("duckduckgo request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("duckduckgo returned HTTP {}", response.status());
        }

        let html = response.text().await.context("duckduckgo response body")?;
        Ok(parse_results(&html, max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_uddg_redirects() {
        let html = r#"
            <div class="result">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Flinkpulse.com%2F&rut=abc">LinkPulse</a>
            </div>
            <div class="result">
              <a class="result__a" href="https://direct.example.com/page">Direct</a>
            </div>
        "#;
        let urls = parse_results(html, 10);
        assert_eq!(
            urls,
            vec![
                "https://linkpulse.com/".to_string(),
                "https://direct.example.com/page".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_caps_results() {
        let html: String = (0..5)
            .map(|i| {
                format!(
                    r#"<a class="result__a" href="https://site{}.com">s</a>"#,
                    i
                )
            })
            .collect();
        assert_eq!(parse_results(&html, 2).len(), 2);
    }

    #[test]
    fn test_parse_ignores_non_http_redirects() {
        let html =
            r#"<a class="result__a" href="//duckduckgo.com/l/?uddg=javascript%3Avoid(0)">x</a>"#;
        assert!(parse_results(html, 10).is_empty());
    }
}
