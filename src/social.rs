//! Social platform probe collector.
//!
//! Issues one non-redirect-following GET against a platform's canonical
//! profile URL and maps the response through a conservative decision table.
//! The standing invariant: prefer `Unknown` over a wrong `Present`/`Absent`.
//! In particular a bare 200 never implies the profile exists, because
//! several platforms serve soft-404 pages with a 200 status.

use std::time::Duration;

use reqwest::{redirect, Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::evidence::{Confidence, Presence, SocialProbeEvidence};
use crate::platforms::Platform;

/// HTTP client for social probes: redirects disabled, short timeout.
///
/// Builder failure propagates rather than falling back to a default
/// client; a default client follows redirects, which would break every
/// redirect-based decision below.
pub fn probe_client(user_agent: &str, timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Probe a platform for a username. Never fails; every failure path
/// degrades to `Unknown`.
pub async fn probe(platform: Platform, username: &str, client: &Client) -> SocialProbeEvidence {
    probe_url(platform, username, &platform.profile_url(username), client).await
}

/// Probe an explicit URL (injectable for tests) with the platform's rules.
pub async fn probe_url(
    platform: Platform,
    username: &str,
    url: &str,
    client: &Client,
) -> SocialProbeEvidence {
    debug!("probing {} for @{}: {}", platform.name(), username, url);

    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!("probe transport failure for {}: {}", url, e);
            return SocialProbeEvidence {
                presence: Presence::Unknown,
                confidence: Confidence::None,
                note: Some("network error - check manually".to_string()),
                error: Some(e.to_string()),
            };
        }
    };

    let status = response.status();
    let redirect_target = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if status.is_redirection() {
        return evaluate_redirect(platform, redirect_target.as_deref());
    }

    let body = response.text().await.unwrap_or_default();
    evaluate_response(platform, status, &body)
}

/// Decision table for non-redirect responses.
pub fn evaluate_response(platform: Platform, status: StatusCode, body: &str) -> SocialProbeEvidence {
    match status.as_u16() {
        404 => SocialProbeEvidence::absent_high(),
        200 => {
            let body_lower = body.to_lowercase();
            if platform
                .negative_markers()
                .iter()
                .any(|m| body_lower.contains(m))
            {
                return SocialProbeEvidence::absent_high();
            }
            if platform
                .positive_markers()
                .iter()
                .any(|m| body_lower.contains(m))
            {
                return SocialProbeEvidence::present_high();
            }
            // 200 with no recognizable markers proves nothing
            SocialProbeEvidence::unknown("no conclusive profile markers - check manually")
        }
        403 => SocialProbeEvidence::unknown("blocked (403) - check manually"),
        429 => SocialProbeEvidence::unknown("rate limited (429) - check manually"),
        999 => SocialProbeEvidence::unknown("blocked (999) - check manually"),
        other => SocialProbeEvidence::unknown(format!("unexpected status {} - check manually", other)),
    }
}

/// Decision rule for 3xx responses: a redirect is `Present` only when the
/// target is unambiguously the platform's own domain and not an auth wall.
pub fn evaluate_redirect(platform: Platform, target: Option<&str>) -> SocialProbeEvidence {
    let Some(target) = target else {
        return SocialProbeEvidence::unknown("redirect without location - check manually");
    };

    let Some(host) = Url::parse(target).ok().and_then(|u| u.host_str().map(String::from)) else {
        // Relative redirects stay on the platform's own host; a login or
        // not-found path is still inconclusive
        return SocialProbeEvidence::unknown(format!("redirected to {} - check manually", target));
    };

    let on_platform = Platform::from_host(&host) == Some(platform);
    let target_lower = target.to_lowercase();
    let auth_wall = ["login", "signin", "sign-in", "accounts/", "authwall", "checkpoint"]
        .iter()
        .any(|m| target_lower.contains(m));

    if on_platform && !auth_wall {
        SocialProbeEvidence {
            presence: Presence::Present,
            confidence: Confidence::Medium,
            note: Some(format!("redirected within platform to {}", target)),
            error: None,
        }
    } else {
        SocialProbeEvidence::unknown(format!("redirected to {} - check manually", target))
    }
}
