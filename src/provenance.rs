//! Provenance tags: which evidence sources justify keeping a record.

use serde::Serialize;

use crate::record::{MatchOrigin, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvenanceTag {
    Whois,
    Dns,
    CrtSh,
    Social,
    OrgTitle,
    DomainPresent,
    SearchHit,
    ProbeHit,
}

impl ProvenanceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceTag::Whois => "WHOIS",
            ProvenanceTag::Dns => "DNS",
            ProvenanceTag::CrtSh => "crt.sh",
            ProvenanceTag::Social => "social",
            ProvenanceTag::OrgTitle => "org_title",
            ProvenanceTag::DomainPresent => "domain_present",
            ProvenanceTag::SearchHit => "search_hit",
            ProvenanceTag::ProbeHit => "probe_hit",
        }
    }

    /// Origin tags record how we found the record, not that the name is
    /// in use; they never count toward usage evidence.
    pub fn is_origin(&self) -> bool {
        matches!(self, ProvenanceTag::SearchHit | ProvenanceTag::ProbeHit)
    }
}

pub fn tags_for(record: &Record) -> Vec<ProvenanceTag> {
    let mut tags = Vec::new();

    if let Some(whois) = &record.whois {
        if whois.ok && !whois.likely_available {
            tags.push(ProvenanceTag::Whois);
        }
    }
    if let Some(dns) = &record.dns {
        if dns.resolves {
            tags.push(ProvenanceTag::Dns);
        }
    }
    if let Some(crt) = &record.crt {
        if crt.entries > 0 {
            tags.push(ProvenanceTag::CrtSh);
        }
    }
    if record.match_type.is_social() {
        tags.push(ProvenanceTag::Social);
    }
    if record.match_type.is_org_title() {
        tags.push(ProvenanceTag::OrgTitle);
    }
    if record.match_type.is_domain() {
        tags.push(ProvenanceTag::DomainPresent);
    }
    match record.origin {
        MatchOrigin::Search => tags.push(ProvenanceTag::SearchHit),
        MatchOrigin::Probe | MatchOrigin::SocialProbe => tags.push(ProvenanceTag::ProbeHit),
    }

    tags
}

pub fn has_usage_evidence(record: &Record) -> bool {
    tags_for(record).iter().any(|t| !t.is_origin())
}

pub fn render_tags(record: &Record) -> String {
    tags_for(record)
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{CrtEvidence, DnsEvidence, WhoisEvidence};
    use crate::record::MatchType;

    fn base_record(match_type: MatchType, origin: MatchOrigin) -> Record {
        Record::new("https://linkpulse.com", match_type, origin)
    }

    #[test]
    fn test_registered_domain_collects_source_tags() {
        let mut record = base_record(MatchType::ExactDomain, MatchOrigin::Probe);
        record.whois = Some(WhoisEvidence {
            ok: true,
            likely_available: false,
            error: None,
        });
        record.dns = Some(DnsEvidence {
            resolves: true,
            error: None,
        });
        record.crt = Some(CrtEvidence {
            ok: true,
            entries: 12,
            error: None,
        });

        let tags = tags_for(&record);
        assert_eq!(
            tags,
            vec![
                ProvenanceTag::Whois,
                ProvenanceTag::Dns,
                ProvenanceTag::CrtSh,
                ProvenanceTag::DomainPresent,
                ProvenanceTag::ProbeHit,
            ]
        );
        assert!(has_usage_evidence(&record));
    }

    #[test]
    fn test_likely_available_whois_yields_no_whois_tag() {
        let mut record = base_record(MatchType::ExactDomain, MatchOrigin::Probe);
        record.whois = Some(WhoisEvidence {
            ok: true,
            likely_available: true,
            error: None,
        });
        assert!(!tags_for(&record).contains(&ProvenanceTag::Whois));
    }

    #[test]
    fn test_origin_tag_alone_is_not_usage_evidence() {
        let record = base_record(MatchType::Mention, MatchOrigin::Search);
        assert_eq!(tags_for(&record), vec![ProvenanceTag::SearchHit]);
        assert!(!has_usage_evidence(&record));
    }

    #[test]
    fn test_social_match_is_usage_evidence() {
        let record = base_record(MatchType::SocialExact, MatchOrigin::SocialProbe);
        assert!(tags_for(&record).contains(&ProvenanceTag::Social));
        assert!(has_usage_evidence(&record));
    }

    #[test]
    fn test_render_joins_display_names() {
        let record = base_record(MatchType::OrgTitleExact, MatchOrigin::Search);
        assert_eq!(render_tags(&record), "org_title, search_hit");
    }
}
