//! Landing-page fetch and lightweight content extraction.
//!
//! A fetched page contributes two classification inputs: the page title
//! (falling back to `og:title`) and a short snippet (meta description,
//! else the first non-trivial paragraph).

use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::debug;

const SNIPPET_MAX_CHARS: usize = 300;

#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub title: Option<String>,
    pub snippet: Option<String>,
}

pub fn fetch_client(user_agent: &str, timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Fetch a URL and extract title/snippet. Non-success statuses and
/// non-HTML bodies yield an empty `PageContent` rather than an error;
/// only transport failures propagate.
pub async fn fetch_page(url: &str, client: &reqwest::Client) -> Result<PageContent> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("fetch failed for {}", url))?;

    let status = response.status();
    if !status.is_success() {
        debug!("fetch of {} returned HTTP {}", url, status);
        return Ok(PageContent::default());
    }

    let html = response
        .text()
        .await
        .with_context(|| format!("body read failed for {}", url))?;
    Ok(extract_content(&html))
}

pub fn extract_content(html: &str) -> PageContent {
    let document = Html::parse_document(html);
    PageContent {
        title: extract_title(&document),
        snippet: extract_snippet(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("title") {
        if let Some(el) = document.select(&selector).next() {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    if let Ok(selector) = Selector::parse(r#"meta[property="og:title"]"#) {
        if let Some(el) = document.select(&selector).next() {
            if let Some(content) = el.value().attr("content") {
                let text = collapse_whitespace(content);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn extract_snippet(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) {
        if let Some(el) = document.select(&selector).next() {
            if let Some(content) = el.value().attr("content") {
                let text = collapse_whitespace(content);
                if !text.is_empty() {
                    return Some(truncate(&text));
                }
            }
        }
    }
    // First paragraph with real prose; skips nav crumbs and empty tags.
    if let Ok(selector) = Selector::parse("p") {
        for el in document.select(&selector) {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if text.len() >= 40 {
                return Some(truncate(&text));
            }
        }
    }
    None
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= SNIPPET_MAX_CHARS {
        s.to_string()
    } else {
        let cut: String = s.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{}...", cut.trim_end())
    }
}
