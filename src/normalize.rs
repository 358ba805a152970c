//! Name normalization and candidate domain generation.
//!
//! Two normal forms exist and must not be confused:
//! - `slug` is the comparison form (letters/digits/hyphen, NFKD-folded)
//! - `domain_base` is the DNS-label-safe form used to build literal domains

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Global TLDs probed for every candidate name.
pub const GLOBAL_TLDS: &[&str] = &[
    "com", "net", "org", "io", "co", "app", "dev", "ai", "xyz",
];

/// Country-code TLDs.
pub const COUNTRY_TLDS: &[&str] = &["id", "co.id", "us", "uk", "co.uk", "de", "sg"];

/// Vertical/brand TLDs.
pub const VERTICAL_TLDS: &[&str] = &["tech", "store", "shop", "site", "online", "agency"];

/// Lowercase, NFKD-fold, and strip everything except letters, digits and
/// hyphens. Used for comparisons only, never to build domain labels.
pub fn slug(s: &str) -> String {
    s.nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Lowercase, NFKD-fold, collapse whitespace and underscores to hyphens,
/// strip everything outside `[a-z0-9-]`, collapse repeated hyphens, and trim
/// leading/trailing hyphens. Idempotent, and the output always matches
/// `^[a-z0-9-]*$` with no hyphen at either end.
pub fn domain_base(s: &str) -> String {
    let folded: String = s
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c.is_whitespace() || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();

    let mut out = String::with_capacity(folded.len());
    let mut prev_hyphen = false;
    for c in folded.chars() {
        if c == '-' {
            if !prev_hyphen {
                out.push('-');
            }
            prev_hyphen = true;
        } else {
            out.push(c);
            prev_hyphen = false;
        }
    }

    out.trim_matches('-').to_string()
}

/// A candidate domain to probe: `{sld}.{tld}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub domain: String,
    pub sld: String,
    pub tld: String,
}

/// Cross-product of `domain_base(name)` with the configured TLD set.
///
/// Returns an empty list when the name normalizes to an empty label.
/// Output order is stable for identical input; duplicate TLDs in the
/// configured set are collapsed.
pub fn build_candidate_domains(name: &str, tlds: &[String]) -> Vec<Candidate> {
    let base = domain_base(name);
    if base.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates = Vec::new();
    for tld in tlds {
        let tld = tld.trim_start_matches('.').trim();
        if tld.is_empty() || !seen.insert(tld) {
            continue;
        }
        candidates.push(Candidate {
            domain: format!("{}.{}", base, tld),
            sld: base.clone(),
            tld: tld.to_string(),
        });
    }
    candidates
}

/// Default TLD set: global + country + vertical lists, in that order.
pub fn default_tlds() -> Vec<String> {
    GLOBAL_TLDS
        .iter()
        .chain(COUNTRY_TLDS.iter())
        .chain(VERTICAL_TLDS.iter())
        .map(|t| t.to_string())
        .collect()
}

/// Split a hostname into (sld, tld), treating the known compound TLDs as a
/// single suffix. Returns None for bare labels with no dot.
pub fn split_domain(hostname: &str) -> Option<(String, String)> {
    let hostname = hostname.trim_end_matches('.').to_lowercase();
    let parts: Vec<&str> = hostname.split('.').collect();
    if parts.len() < 2 {
        return None;
    }

    let compound_tlds = [
        "co.id", "co.uk", "co.au", "com.au", "co.nz", "co.jp", "com.br", "com.mx", "org.uk",
    ];
    let last_two = format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]);
    if compound_tlds.contains(&last_two.as_str()) && parts.len() >= 3 {
        Some((parts[parts.len() - 3].to_string(), last_two))
    } else {
        Some((
            parts[parts.len() - 2].to_string(),
            parts[parts.len() - 1].to_string(),
        ))
    }
}
