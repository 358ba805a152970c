//! Report rendering: flattened CSV rows, a JSON document, and the console
//! summary printed at the end of a run.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::provenance;
use crate::record::{Record, UsageVerdict};
use crate::score::BrandScore;

/// One name's verdict and score, as reported.
#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub verdict: UsageVerdict,
    pub score: BrandScore,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(entries: Vec<ReportEntry>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            entries,
        }
    }
}

/// One record flattened for spreadsheet-style output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    domain: &'a str,
    tld: &'a str,
    hostname: &'a str,
    url: &'a str,
    title: &'a str,
    snippet: &'a str,
    dns_resolves: &'a str,
    whois_likely_available: &'a str,
    cert_entries: String,
    match_type: &'a str,
    match_score: u32,
    social_platform: &'a str,
    social_username: &'a str,
    provenance: String,
    in_use: bool,
}

fn flatten<'a>(name: &'a str, record: &'a Record) -> CsvRow<'a> {
    let dns_resolves = match &record.dns {
        Some(d) if d.resolves => "yes",
        Some(_) => "no",
        None => "",
    };
    let whois_likely_available = match &record.whois {
        Some(w) if !w.ok => "unknown",
        Some(w) if w.likely_available => "yes",
        Some(_) => "no",
        None => "",
    };
    let cert_entries = record
        .crt
        .as_ref()
        .map(|c| c.entries.to_string())
        .unwrap_or_default();

    CsvRow {
        name,
        domain: record.domain.as_deref().unwrap_or(""),
        tld: record.tld.as_deref().unwrap_or(""),
        hostname: record.hostname.as_deref().unwrap_or(""),
        url: &record.url,
        title: record.title.as_deref().unwrap_or(""),
        snippet: record.snippet.as_deref().unwrap_or(""),
        dns_resolves,
        whois_likely_available,
        cert_entries,
        match_type: record.match_type.as_str(),
        match_score: record.match_score,
        social_platform: record.social_platform.as_deref().unwrap_or(""),
        social_username: record.social_username.as_deref().unwrap_or(""),
        provenance: provenance::render_tags(record),
        in_use: provenance::has_usage_evidence(record),
    }
}

pub fn write_csv(report: &Report, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;

    for entry in &report.entries {
        for record in &entry.verdict.records {
            writer.serialize(flatten(&entry.verdict.name, record))?;
        }
    }
    writer.flush().context("flushing csv output")?;
    info!("wrote CSV report to {}", path.display());
    Ok(())
}

pub fn write_json(report: &Report, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing report")?;
    let mut file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote JSON report to {}", path.display());
    Ok(())
}

/// Human summary printed after each name.
pub fn print_summary(entry: &ReportEntry) {
    let verdict = &entry.verdict;
    let score = &entry.score;

    println!();
    println!("=== {} ===", verdict.name);
    println!(
        "Overall: {}/100 (grade {})",
        score.overall,
        score.grade.as_str()
    );
    let b = &score.breakdown;
    for (label, category) in [
        ("domains", &b.domains),
        ("social", &b.social),
        ("trademark", &b.trademark),
        ("seo", &b.seo),
        ("memorability", &b.memorability),
    ] {
        println!(
            "  {:<13} {:>3} x {:.2} = {:>5.1}",
            label, category.score, category.weight, category.weighted
        );
    }
    println!("Records found: {}", verdict.found_count);

    for record in verdict.records.iter().take(10) {
        let tags = provenance::render_tags(record);
        println!(
            "  [{:>3}] {:<16} {}  ({})",
            record.match_score,
            record.match_type.as_str(),
            record.url,
            tags
        );
    }
    if verdict.records.len() > 10 {
        println!("  ... and {} more", verdict.records.len() - 10);
    }

    for rec in &score.recommendations {
        println!("  {:?}: {}", rec.priority, rec.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::{CrtEvidence, DnsEvidence, WhoisEvidence};
    use crate::record::{MatchOrigin, MatchType};
    use crate::score::score_brand;

    fn sample_entry() -> ReportEntry {
        let mut record = Record::new(
            "https://linkpulse.com",
            MatchType::ExactDomain,
            MatchOrigin::Probe,
        );
        record.domain = Some("linkpulse.com".to_string());
        record.tld = Some("com".to_string());
        record.hostname = Some("linkpulse.com".to_string());
        record.dns = Some(DnsEvidence {
            resolves: true,
            error: None,
        });
        record.whois = Some(WhoisEvidence {
            ok: true,
            likely_available: false,
            error: None,
        });
        record.crt = Some(CrtEvidence {
            ok: true,
            entries: 3,
            error: None,
        });

        let verdict = UsageVerdict::new("LinkPulse", vec![record]);
        let score = score_brand(&verdict);
        ReportEntry { verdict, score }
    }

    #[test]
    fn test_flatten_renders_evidence_columns() {
        let entry = sample_entry();
        let row = flatten(&entry.verdict.name, &entry.verdict.records[0]);
        assert_eq!(row.dns_resolves, "yes");
        assert_eq!(row.whois_likely_available, "no");
        assert_eq!(row.cert_entries, "3");
        assert_eq!(row.match_type, "exact_domain");
        assert!(row.in_use);
        assert!(row.provenance.contains("WHOIS"));
    }

    #[test]
    fn test_csv_report_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let report = Report::new(vec![sample_entry()]);

        write_csv(&report, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("name,domain,tld"));
        assert!(contents.contains("linkpulse.com"));
    }

    #[test]
    fn test_json_report_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::new(vec![sample_entry()]);

        write_json(&report, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["entries"][0]["verdict"]["name"], "LinkPulse");

        let breakdown = &parsed["entries"][0]["score"]["breakdown"];
        for category in ["domains", "social", "trademark", "seo", "memorability"] {
            assert!(breakdown[category]["score"].is_u64(), "{} score", category);
            assert!(breakdown[category]["weight"].is_f64(), "{} weight", category);
            assert!(breakdown[category]["weighted"].is_f64(), "{} weighted", category);
        }
    }
}
