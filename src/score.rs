//! Brand viability scoring over a name's usage verdict.
//!
//! Five weighted categories roll up into an overall score and letter grade.
//! All weights and bucket thresholds are fixed constants; downstream
//! reports and fixtures depend on their exact values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::normalize::{domain_base, slug};
use crate::platforms::CRITICAL_PLATFORMS;
use crate::record::{MatchType, Record, UsageVerdict};

const WEIGHT_DOMAIN: f64 = 0.30;
const WEIGHT_SOCIAL: f64 = 0.25;
const WEIGHT_TRADEMARK: f64 = 0.20;
const WEIGHT_SEO: f64 = 0.15;
const WEIGHT_MEMORABILITY: f64 = 0.10;

/// TLDs whose availability dominates the domain sub-score.
pub const CRITICAL_TLDS: &[&str] = &["com", "net", "org", "io", "co"];

/// Names leaning on these tokens compete with every other brand using them.
const OVERUSED_WORDS: &[&str] = &[
    "app", "tech", "online", "digital", "cloud", "hub", "labs", "lab", "pro", "web", "smart",
    "solutions", "global",
];

static VOWEL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]+").unwrap());
static CONSONANT_CLUSTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[bcdfghjklmnpqrstvwxz]{4,}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Inclusive lower bounds at 90/80/70/60/50.
    pub fn from_overall(overall: u32) -> Self {
        match overall {
            90..=u32::MAX => Grade::APlus,
            80..=89 => Grade::A,
            70..=79 => Grade::B,
            60..=69 => Grade::C,
            50..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: &'static str,
    pub message: String,
}

/// One category's contribution to the overall score.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoryScore {
    pub score: u32,
    pub weight: f64,
    pub weighted: f64,
}

impl CategoryScore {
    fn new(score: u32, weight: f64) -> Self {
        Self {
            score,
            weight,
            weighted: score as f64 * weight,
        }
    }
}

/// Per-category scores with their weights; serializes as a map of
/// category to {score, weight, weighted}.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreBreakdown {
    pub domains: CategoryScore,
    pub social: CategoryScore,
    pub trademark: CategoryScore,
    pub seo: CategoryScore,
    pub memorability: CategoryScore,
}

impl ScoreBreakdown {
    /// Sum of the weighted contributions, before rounding.
    pub fn weighted_total(&self) -> f64 {
        self.domains.weighted
            + self.social.weighted
            + self.trademark.weighted
            + self.seo.weighted
            + self.memorability.weighted
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandScore {
    pub name: String,
    pub overall: u32,
    pub grade: Grade,
    pub breakdown: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
}

pub fn score_brand(verdict: &UsageVerdict) -> BrandScore {
    let breakdown = ScoreBreakdown {
        domains: CategoryScore::new(
            domain_availability_score(&verdict.name, &verdict.records),
            WEIGHT_DOMAIN,
        ),
        social: CategoryScore::new(social_availability_score(&verdict.records), WEIGHT_SOCIAL),
        trademark: CategoryScore::new(trademark_risk_score(&verdict.records), WEIGHT_TRADEMARK),
        seo: CategoryScore::new(seo_score(&verdict.name), WEIGHT_SEO),
        memorability: CategoryScore::new(memorability_score(&verdict.name), WEIGHT_MEMORABILITY),
    };

    let overall = breakdown.weighted_total().round() as u32;
    let recommendations = build_recommendations(overall, &breakdown);

    BrandScore {
        name: verdict.name.clone(),
        overall,
        grade: Grade::from_overall(overall),
        breakdown,
        recommendations,
    }
}

/// A critical TLD counts as taken when any record for it shows DNS
/// resolution, certificate entries, or WHOIS that is not "likely available."
fn domain_availability_score(name: &str, records: &[Record]) -> u32 {
    let base = domain_base(name);
    let available = CRITICAL_TLDS
        .iter()
        .filter(|tld| {
            let candidate = format!("{}.{}", base, tld);
            !records.iter().any(|r| {
                r.domain.as_deref() == Some(candidate.as_str()) && record_shows_domain_taken(r)
            })
        })
        .count();

    let pct = available as f64 / CRITICAL_TLDS.len() as f64;
    if pct >= 1.0 {
        100
    } else if pct >= 0.75 {
        80
    } else if pct >= 0.5 {
        60
    } else if pct > 0.0 {
        40
    } else {
        20
    }
}

fn record_shows_domain_taken(record: &Record) -> bool {
    let dns_taken = record.dns.as_ref().map(|d| d.resolves).unwrap_or(false);
    let crt_taken = record.crt.as_ref().map(|c| c.entries > 0).unwrap_or(false);
    let whois_taken = record
        .whois
        .as_ref()
        .map(|w| w.ok && !w.likely_available)
        .unwrap_or(false);
    dns_taken || crt_taken || whois_taken
}

/// A critical platform counts as taken when a verified-present probe or any
/// search-found social record exists for it.
fn social_availability_score(records: &[Record]) -> u32 {
    let available = CRITICAL_PLATFORMS
        .iter()
        .filter(|platform| {
            !records.iter().any(|r| {
                r.social_platform.as_deref() == Some(platform.name())
                    && record_shows_handle_taken(r)
            })
        })
        .count();

    ((available as f64 / CRITICAL_PLATFORMS.len() as f64) * 100.0).round() as u32
}

fn record_shows_handle_taken(record: &Record) -> bool {
    use crate::evidence::Presence;
    use crate::record::MatchOrigin;

    let verified_present = record
        .social_probe
        .as_ref()
        .map(|p| p.presence == Presence::Present)
        .unwrap_or(false);
    let search_found = record.origin == MatchOrigin::Search && record.match_type.is_social();
    verified_present || search_found
}

/// Higher means lower risk. Bucketed by how much exact-name usage exists.
fn trademark_risk_score(records: &[Record]) -> u32 {
    let exact = records
        .iter()
        .filter(|r| matches!(r.match_type, MatchType::ExactDomain | MatchType::SocialExact))
        .count();
    let org = records
        .iter()
        .filter(|r| r.match_type.is_org_title())
        .count();

    if exact == 0 && org == 0 {
        100
    } else if exact == 0 && org <= 2 {
        80
    } else if exact <= 2 {
        60
    } else if exact <= 5 {
        40
    } else {
        20
    }
}

/// Searchability heuristics on the domain-base form. Sub-factor points sum
/// to a maximum of exactly 100.
fn seo_score(name: &str) -> u32 {
    let base = domain_base(name);
    if base.is_empty() {
        return 0;
    }
    let len = base.chars().count();

    let length_pts = if len <= 6 {
        15
    } else if len <= 10 {
        10
    } else {
        5
    };

    let composition_pts = if base.chars().all(|c| c.is_ascii_alphabetic()) {
        20
    } else if base.chars().all(|c| c.is_ascii_alphanumeric()) {
        15
    } else {
        10
    };

    let letters: Vec<char> = base.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let vowels = letters
        .iter()
        .filter(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y'))
        .count();
    let vowel_ratio = if letters.is_empty() {
        0.0
    } else {
        vowels as f64 / letters.len() as f64
    };
    let vowel_pts = if (0.3..=0.6).contains(&vowel_ratio) { 25 } else { 15 };

    let cluster_pts = if CONSONANT_CLUSTER.is_match(&base) { 10 } else { 20 };

    let overused = OVERUSED_WORDS.iter().any(|w| base.contains(w));
    let common_word_pts = if overused { 10 } else { 20 };

    length_pts + composition_pts + vowel_pts + cluster_pts + common_word_pts
}

/// Length bucket plus bonuses for repetition, pronounceable syllable count,
/// and alliteration across the original words. Capped at 100.
fn memorability_score(name: &str) -> u32 {
    let base = slug(name);
    if base.is_empty() {
        return 0;
    }
    let len = base.chars().count();

    let mut score: u32 = if len <= 5 {
        40
    } else if len <= 8 {
        30
    } else if len <= 12 {
        20
    } else {
        10
    };

    if has_repeated_substring(&base) {
        score += 20;
    }

    let syllables = syllable_count(&base);
    if (2..=3).contains(&syllables) {
        score += 25;
    } else if syllables == 1 || syllables == 4 {
        score += 15;
    }

    if has_alliteration(name) {
        score += 15;
    }

    score.min(100)
}

fn has_repeated_substring(base: &str) -> bool {
    let chars: Vec<char> = base.chars().collect();
    if chars.len() < 4 {
        return false;
    }
    for width in 2..=(chars.len() / 2) {
        for start in 0..=(chars.len() - 2 * width) {
            let chunk = &chars[start..start + width];
            let rest: String = chars[start + width..].iter().collect();
            let chunk: String = chunk.iter().collect();
            if rest.contains(&chunk) {
                return true;
            }
        }
    }
    false
}

fn syllable_count(base: &str) -> usize {
    VOWEL_RUN.find_iter(base).count()
}

fn has_alliteration(name: &str) -> bool {
    let initials: Vec<char> = name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    if initials.len() < 2 {
        return false;
    }
    initials.windows(2).any(|pair| pair[0] == pair[1])
}

fn build_recommendations(overall: u32, breakdown: &ScoreBreakdown) -> Vec<Recommendation> {
    let domain = breakdown.domains.score;
    let social = breakdown.social.score;
    let trademark = breakdown.trademark.score;
    let seo = breakdown.seo.score;
    let memorability = breakdown.memorability.score;
    let mut recs = Vec::new();

    if domain < 70 {
        recs.push(Recommendation {
            priority: Priority::High,
            category: "domains",
            message: "Key TLDs appear taken; review alternative TLDs or name variants".to_string(),
        });
    }
    if social < 50 {
        recs.push(Recommendation {
            priority: Priority::High,
            category: "social",
            message: "Handles are taken on major platforms; consider a prefixed or suffixed handle"
                .to_string(),
        });
    }
    if trademark < 60 {
        recs.push(Recommendation {
            priority: Priority::High,
            category: "trademark",
            message: "Exact-name usage found; consult trademark counsel before committing"
                .to_string(),
        });
    }
    if seo < 60 {
        recs.push(Recommendation {
            priority: Priority::Medium,
            category: "seo",
            message: "Name may be hard to rank or type; consider a shorter, simpler form"
                .to_string(),
        });
    }
    if memorability < 50 {
        recs.push(Recommendation {
            priority: Priority::Low,
            category: "memorability",
            message: "Name may be hard to recall; shorter names with 2-3 syllables stick better"
                .to_string(),
        });
    }

    let overall_rec = if overall >= 80 {
        Recommendation {
            priority: Priority::Low,
            category: "overall",
            message: "Strong candidate; secure the key domain and handles promptly".to_string(),
        }
    } else if overall >= 60 {
        Recommendation {
            priority: Priority::Medium,
            category: "overall",
            message: "Viable with caveats; address the flagged areas before launch".to_string(),
        }
    } else {
        Recommendation {
            priority: Priority::High,
            category: "overall",
            message: "Significant conflicts found; consider alternative names".to_string(),
        }
    };
    recs.push(overall_rec);

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{DnsEvidence, Presence, SocialProbeEvidence};
    use crate::record::MatchOrigin;

    fn verdict(name: &str, records: Vec<Record>) -> UsageVerdict {
        UsageVerdict::new(name, records)
    }

    fn taken_domain_record(domain: &str) -> Record {
        let mut r = Record::new(
            format!("https://{}", domain),
            MatchType::ExactDomain,
            MatchOrigin::Probe,
        );
        r.domain = Some(domain.to_string());
        r.dns = Some(DnsEvidence {
            resolves: true,
            error: None,
        });
        r
    }

    #[test]
    fn test_clean_name_scores_all_critical_tlds_available() {
        let score = domain_availability_score("zephyrine", &[]);
        assert_eq!(score, 100);
    }

    #[test]
    fn test_all_critical_tlds_taken_bottoms_out() {
        let records: Vec<Record> = CRITICAL_TLDS
            .iter()
            .map(|tld| taken_domain_record(&format!("linkpulse.{}", tld)))
            .collect();
        assert_eq!(domain_availability_score("LinkPulse", &records), 20);
    }

    #[test]
    fn test_one_taken_tld_hits_eighty_bucket() {
        let records = vec![taken_domain_record("linkpulse.com")];
        // 4 of 5 available = 80% -> the >=75% bucket.
        assert_eq!(domain_availability_score("LinkPulse", &records), 80);
    }

    #[test]
    fn test_unresolved_record_does_not_mark_tld_taken() {
        let mut r = taken_domain_record("linkpulse.com");
        r.dns = Some(DnsEvidence {
            resolves: false,
            error: None,
        });
        assert_eq!(domain_availability_score("LinkPulse", &[r]), 100);
    }

    #[test]
    fn test_social_score_counts_verified_present_only() {
        let mut probed = Record::new(
            "https://instagram.com/linkpulse",
            MatchType::SocialExact,
            MatchOrigin::SocialProbe,
        );
        probed.social_platform = Some("instagram".to_string());
        probed.social_username = Some("linkpulse".to_string());
        probed.social_probe = Some(SocialProbeEvidence::unknown("ambiguous response"));

        // Unknown presence keeps the platform available.
        assert_eq!(social_availability_score(&[probed.clone()]), 100);

        probed.social_probe = Some(SocialProbeEvidence::present_high());
        // 5 of 6 critical platforms available.
        assert_eq!(social_availability_score(&[probed]), 83);
    }

    #[test]
    fn test_trademark_buckets() {
        assert_eq!(trademark_risk_score(&[]), 100);

        let org = Record::new(
            "https://registry.example.com/linkpulse-inc",
            MatchType::OrgTitleExact,
            MatchOrigin::Search,
        );
        assert_eq!(trademark_risk_score(&[org.clone()]), 80);

        let exact = taken_domain_record("linkpulse.com");
        assert_eq!(trademark_risk_score(&[exact.clone()]), 60);

        let many: Vec<Record> = (0..6).map(|_| exact.clone()).collect();
        assert_eq!(trademark_risk_score(&many), 20);

        let five: Vec<Record> = (0..5).map(|_| exact.clone()).collect();
        assert_eq!(trademark_risk_score(&five), 40);
    }

    #[test]
    fn test_seo_score_max_is_100() {
        // Short, all-alpha, balanced vowels, no clusters, no overused words.
        assert_eq!(seo_score("pulse"), 100);
    }

    #[test]
    fn test_seo_penalizes_clusters_and_common_words() {
        assert!(seo_score("strngthsapp") < seo_score("pulse"));
    }

    #[test]
    fn test_memorability_capped() {
        // Short, repeated substring, 2 syllables, alliterative words.
        let score = memorability_score("Coco Cola");
        assert!(score <= 100);
        assert!(score >= 80);
    }

    #[test]
    fn test_grade_boundaries_exact() {
        assert_eq!(Grade::from_overall(90), Grade::APlus);
        assert_eq!(Grade::from_overall(89), Grade::A);
        assert_eq!(Grade::from_overall(80), Grade::A);
        assert_eq!(Grade::from_overall(79), Grade::B);
        assert_eq!(Grade::from_overall(70), Grade::B);
        assert_eq!(Grade::from_overall(60), Grade::C);
        assert_eq!(Grade::from_overall(50), Grade::D);
        assert_eq!(Grade::from_overall(49), Grade::F);
    }

    #[test]
    fn test_overall_in_range_and_recommendations_present() {
        let score = score_brand(&verdict("LinkPulse", vec![taken_domain_record("linkpulse.com")]));
        assert!(score.overall <= 100);
        assert!(!score.recommendations.is_empty());
        assert!(score
            .recommendations
            .iter()
            .any(|r| r.category == "overall"));
    }

    #[test]
    fn test_breakdown_carries_weights_and_weighted_contributions() {
        let score = score_brand(&verdict("LinkPulse", vec![taken_domain_record("linkpulse.com")]));
        let b = &score.breakdown;

        assert_eq!(b.domains.weight, WEIGHT_DOMAIN);
        assert_eq!(b.social.weight, WEIGHT_SOCIAL);
        assert_eq!(b.trademark.weight, WEIGHT_TRADEMARK);
        assert_eq!(b.seo.weight, WEIGHT_SEO);
        assert_eq!(b.memorability.weight, WEIGHT_MEMORABILITY);

        assert_eq!(b.domains.weighted, b.domains.score as f64 * WEIGHT_DOMAIN);
        assert_eq!(score.overall, b.weighted_total().round() as u32);
    }

    #[test]
    fn test_breakdown_serializes_as_category_map() {
        let score = score_brand(&verdict("LinkPulse", Vec::new()));
        let json = serde_json::to_value(&score).unwrap();
        let domains = &json["breakdown"]["domains"];
        assert!(domains["score"].is_u64());
        assert!(domains["weight"].is_f64());
        assert!(domains["weighted"].is_f64());
    }
}
