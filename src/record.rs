//! The record model accumulated and scored by the pipeline.

use serde::{Deserialize, Serialize};

use crate::evidence::{CrtEvidence, DnsEvidence, SocialProbeEvidence, WhoisEvidence};

/// How an observation matched the queried name. Scores are fixed constants;
/// deduplication relies on them as the tie-break, so they are never computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactDomain,
    SocialExact,
    DomainContains,
    OrgTitleExact,
    SocialContains,
    OrgTitleContains,
    Mention,
}

impl MatchType {
    pub fn score(&self) -> u32 {
        match self {
            MatchType::ExactDomain => 100,
            MatchType::SocialExact => 90,
            MatchType::DomainContains => 80,
            MatchType::OrgTitleExact => 75,
            MatchType::SocialContains => 70,
            MatchType::OrgTitleContains => 60,
            MatchType::Mention => 20,
        }
    }

    pub fn is_social(&self) -> bool {
        matches!(self, MatchType::SocialExact | MatchType::SocialContains)
    }

    pub fn is_org_title(&self) -> bool {
        matches!(self, MatchType::OrgTitleExact | MatchType::OrgTitleContains)
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, MatchType::ExactDomain | MatchType::DomainContains)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::ExactDomain => "exact_domain",
            MatchType::SocialExact => "social_exact",
            MatchType::DomainContains => "domain_contains",
            MatchType::OrgTitleExact => "org_title_exact",
            MatchType::SocialContains => "social_contains",
            MatchType::OrgTitleContains => "org_title_contains",
            MatchType::Mention => "mention",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which arm of the pipeline produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    Probe,
    Search,
    SocialProbe,
}

impl MatchOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOrigin::Probe => "probe",
            MatchOrigin::Search => "search",
            MatchOrigin::SocialProbe => "social_probe",
        }
    }
}

/// One observed usage of a name, with whatever evidence has been attached.
///
/// Domain fields are None for pure social identities. A record is mutated
/// once during enrichment and never after provenance calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tld: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sld: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub match_type: MatchType,
    pub match_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois: Option<WhoisEvidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsEvidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crt: Option<CrtEvidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_probe: Option<SocialProbeEvidence>,
    pub origin: MatchOrigin,
}

impl Record {
    pub fn new(url: impl Into<String>, match_type: MatchType, origin: MatchOrigin) -> Self {
        Self {
            url: url.into(),
            domain: None,
            hostname: None,
            tld: None,
            sld: None,
            title: None,
            snippet: None,
            match_score: match_type.score(),
            match_type,
            social_platform: None,
            social_username: None,
            whois: None,
            dns: None,
            crt: None,
            social_probe: None,
            origin,
        }
    }

    /// Canonical identity used to collapse duplicate observations:
    /// `platform:username` for social matches, else domain, hostname, or the
    /// raw URL as last resort. Always lowercased.
    pub fn dedup_key(&self) -> String {
        if self.match_type.is_social() {
            if let (Some(platform), Some(username)) =
                (self.social_platform.as_deref(), self.social_username.as_deref())
            {
                return format!("{}:{}", platform, username).to_lowercase();
            }
        }
        self.domain
            .as_deref()
            .or(self.hostname.as_deref())
            .unwrap_or(&self.url)
            .to_lowercase()
    }

    /// Whether the probe pipeline has already attached domain evidence.
    pub fn is_enriched(&self) -> bool {
        self.whois.is_some() || self.dns.is_some() || self.crt.is_some()
    }
}

/// Per-name result of the whole pipeline. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct UsageVerdict {
    pub name: String,
    pub records: Vec<Record>,
    pub found_count: usize,
}

impl UsageVerdict {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        let found_count = records.len();
        Self {
            name: name.into(),
            records,
            found_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_fixed() {
        assert_eq!(MatchType::ExactDomain.score(), 100);
        assert_eq!(MatchType::SocialExact.score(), 90);
        assert_eq!(MatchType::DomainContains.score(), 80);
        assert_eq!(MatchType::OrgTitleExact.score(), 75);
        assert_eq!(MatchType::SocialContains.score(), 70);
        assert_eq!(MatchType::OrgTitleContains.score(), 60);
        assert_eq!(MatchType::Mention.score(), 20);
    }

    #[test]
    fn test_dedup_key_social_uses_platform_and_username() {
        let mut record = Record::new(
            "https://instagram.com/LinkPulse/",
            MatchType::SocialExact,
            MatchOrigin::Search,
        );
        record.social_platform = Some("instagram".to_string());
        record.social_username = Some("LinkPulse".to_string());
        assert_eq!(record.dedup_key(), "instagram:linkpulse");
    }

    #[test]
    fn test_dedup_key_falls_back_through_domain_hostname_url() {
        let mut record = Record::new(
            "https://Blog.LinkPulse.com/post",
            MatchType::Mention,
            MatchOrigin::Search,
        );
        assert_eq!(record.dedup_key(), "https://blog.linkpulse.com/post");
        record.hostname = Some("Blog.LinkPulse.com".to_string());
        assert_eq!(record.dedup_key(), "blog.linkpulse.com");
        record.domain = Some("linkpulse.com".to_string());
        assert_eq!(record.dedup_key(), "linkpulse.com");
    }
}
