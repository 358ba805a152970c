//! Match classification: one observed URL/title against one queried name.
//!
//! Rules run in strict precedence order and the first hit wins. The scores
//! are fixed per match type; downstream deduplication uses them as the
//! tie-break, so the ordering and values here are contractual.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::normalize::{domain_base, slug, split_domain};
use crate::platforms::{self, Platform};
use crate::record::MatchType;

/// Title patterns that look like a company or legal entity.
static ORG_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(inc|llc|ltd|gmbh|corp|corporation|company|co\.|pt|pte|plc|s\.a\.|official|studio|agency|labs?|group|ventures?)\b",
    )
    .unwrap()
});

/// Outcome of classifying a single observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub match_type: MatchType,
    pub score: u32,
    pub social: Option<(Platform, String)>,
}

impl Classification {
    fn of(match_type: MatchType) -> Self {
        Self {
            score: match_type.score(),
            match_type,
            social: None,
        }
    }
}

/// Classify an observed URL (plus optional page title) against a query name.
///
/// Total: always returns exactly one match type, `mention` as the fallback.
/// Deterministic for identical input.
pub fn classify(query: &str, url: &str, title: Option<&str>) -> Classification {
    let query_slug = slug(query);

    let hostname = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()));
    let sld = hostname
        .as_deref()
        .and_then(split_domain)
        .map(|(sld, _)| sld);

    // Rules 1 and 2 accept either normal form of the query: the slug
    // ("linkpulse") or the domain base ("link-pulse" for "Link Pulse"), so a
    // multi-word name matches its own candidate domain. The SLD itself is
    // never hyphen-stripped; "co-op" must not exact-match coop.com.
    let query_base = domain_base(query);
    if let Some(sld) = sld.as_deref() {
        // Rule 1: SLD equals a normal form of the query.
        if (!query_slug.is_empty() && sld == query_slug)
            || (!query_base.is_empty() && sld == query_base)
        {
            return Classification::of(MatchType::ExactDomain);
        }
        // Rule 2: either contains the other.
        let contains = |q: &str| {
            !q.is_empty() && !sld.is_empty() && (sld.contains(q) || q.contains(sld))
        };
        if contains(&query_slug) || contains(&query_base) {
            return Classification::of(MatchType::DomainContains);
        }
    }

    // Rule 3: social username extracted from the URL via the platform table.
    if let Some((platform, username)) = platforms::extract_username(url) {
        let username_slug = slug(&username);
        if !query_slug.is_empty() && !username_slug.is_empty() {
            if username_slug == query_slug {
                let mut c = Classification::of(MatchType::SocialExact);
                c.social = Some((platform, username));
                return c;
            }
            if username_slug.contains(&query_slug) || query_slug.contains(&username_slug) {
                let mut c = Classification::of(MatchType::SocialContains);
                c.social = Some((platform, username));
                return c;
            }
        }
    }

    // Rule 4: organization-looking title containing the query. The legal-form
    // keywords are stripped before comparison so "LinkPulse Inc" can still be
    // an exact title match for "linkpulse".
    if let Some(title) = title {
        if ORG_TITLE_REGEX.is_match(title) {
            let residue = ORG_TITLE_REGEX.replace_all(title, " ");
            let title_slug = slug(&residue);
            if !query_slug.is_empty() {
                if title_slug == query_slug {
                    return Classification::of(MatchType::OrgTitleExact);
                }
                if title_slug.contains(&query_slug) {
                    return Classification::of(MatchType::OrgTitleContains);
                }
            }
        }
    }

    Classification::of(MatchType::Mention)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_domain() {
        let c = classify("LinkPulse", "https://linkpulse.com", None);
        assert_eq!(c.match_type, MatchType::ExactDomain);
        assert_eq!(c.score, 100);
    }

    #[test]
    fn test_multiword_name_matches_hyphenated_domain() {
        let c = classify("Link Pulse", "https://link-pulse.com", None);
        assert_eq!(c.match_type, MatchType::ExactDomain);
        let c = classify("Link Pulse", "https://linkpulse.com", None);
        assert_eq!(c.match_type, MatchType::ExactDomain);
    }

    #[test]
    fn test_hyphenated_query_does_not_match_collapsed_domain() {
        let c = classify("co-op", "https://coop.com", None);
        assert_ne!(c.match_type, MatchType::ExactDomain);
    }

    #[test]
    fn test_domain_contains_both_directions() {
        let c = classify("linkpulse", "https://mylinkpulse.com", None);
        assert_eq!(c.match_type, MatchType::DomainContains);
        assert_eq!(c.score, 80);

        let c = classify("mylinkpulse", "https://linkpulse.com", None);
        assert_eq!(c.match_type, MatchType::DomainContains);
    }

    #[test]
    fn test_social_exact() {
        let c = classify("linkpulse", "https://instagram.com/linkpulse/", None);
        assert_eq!(c.match_type, MatchType::SocialExact);
        assert_eq!(c.score, 90);
        let (platform, username) = c.social.unwrap();
        assert_eq!(platform, Platform::Instagram);
        assert_eq!(username, "linkpulse");
    }

    #[test]
    fn test_social_contains() {
        let c = classify("linkpulse", "https://x.com/linkpulse_id", None);
        assert_eq!(c.match_type, MatchType::SocialContains);
        assert_eq!(c.score, 70);
    }

    #[test]
    fn test_domain_rule_beats_social_rule() {
        // instagram.com's own sld never equals the query, so rule order only
        // matters when the observation host matches the query; an exact
        // domain hit must win over any later rule.
        let c = classify("instagram", "https://instagram.com/somebody", None);
        assert_eq!(c.match_type, MatchType::ExactDomain);
    }

    #[test]
    fn test_org_title_exact_and_contains() {
        let c = classify(
            "linkpulse",
            "https://directory.example.com/listing",
            Some("LinkPulse Inc"),
        );
        assert_eq!(c.match_type, MatchType::OrgTitleExact);
        assert_eq!(c.score, 75);

        let c = classify(
            "linkpulse",
            "https://directory.example.com/listing",
            Some("PT LinkPulse Digital Agency"),
        );
        assert_eq!(c.match_type, MatchType::OrgTitleContains);
        assert_eq!(c.score, 60);
    }

    #[test]
    fn test_plain_title_without_org_keyword_is_mention() {
        let c = classify(
            "linkpulse",
            "https://news.example.com/article",
            Some("LinkPulse raises questions"),
        );
        assert_eq!(c.match_type, MatchType::Mention);
        assert_eq!(c.score, 20);
    }

    #[test]
    fn test_mention_fallback_is_total() {
        let c = classify("linkpulse", "https://unrelated.example.org/page", None);
        assert_eq!(c.match_type, MatchType::Mention);
        let c = classify("", "not a url at all", None);
        assert_eq!(c.match_type, MatchType::Mention);
    }
}
