//! Shared wiremock helpers for the integration suites.

#![allow(dead_code)]

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// DoH server answering A queries for `domain` with the given addresses.
/// An empty address list produces an NXDOMAIN-style empty answer.
pub async fn mock_doh_server(domain: &str, addresses: Vec<&str>) -> MockServer {
    let server = MockServer::start().await;

    let answers: Vec<serde_json::Value> = addresses
        .iter()
        .map(|addr| {
            serde_json::json!({
                "name": domain,
                "type": 1,
                "TTL": 300,
                "data": addr
            })
        })
        .collect();

    let body = serde_json::json!({
        "Status": if answers.is_empty() { 3 } else { 0 },
        "Question": [{ "name": domain, "type": 1 }],
        "Answer": answers
    });

    Mock::given(method("GET"))
        .and(query_param("name", domain))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .insert_header("content-type", "application/dns-json"),
        )
        .mount(&server)
        .await;

    server
}

/// crt.sh-style server returning a fixed body for any query.
pub async fn mock_crt_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

/// Profile page server for social probe tests.
pub async fn mock_profile_page(url_path: &str, status: u16, html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(html))
        .mount(&server)
        .await;
    server
}

/// Search endpoint serving one HTML page for any query.
pub async fn mock_search_page(url_path: &str, html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;
    server
}
