//! Evidence types shared by all collectors.
//!
//! Every collector returns a value here instead of raising; a transport
//! failure is data, not an exception. `Unknown` means "no conclusion" and
//! must never be collapsed into `Absent` downstream.

use serde::{Deserialize, Serialize};

/// Tri-state outcome of a single evidence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Present,
    Absent,
    Unknown,
}

/// Qualitative reliability of a tri-state outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    None,
}

/// WHOIS registration evidence for one domain.
///
/// This source alone collapses the tri-state into a boolean:
/// `likely_available = false` means "taken or unknown", never "taken".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhoisEvidence {
    /// Whether the lookup itself succeeded.
    pub ok: bool,
    /// True only when the raw text contains an explicit availability phrase.
    pub likely_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WhoisEvidence {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            likely_available: false,
            error: Some(error.into()),
        }
    }
}

/// DNS resolution evidence for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsEvidence {
    /// True if an A or AAAA lookup yielded at least one address.
    pub resolves: bool,
    /// Transport failure detail; `resolves` stays false either way.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Certificate transparency evidence for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrtEvidence {
    pub ok: bool,
    /// Number of log entries; the count, not the content, drives scoring.
    pub entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CrtEvidence {
    pub fn empty() -> Self {
        Self {
            ok: true,
            entries: 0,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            entries: 0,
            error: Some(error.into()),
        }
    }
}

/// Outcome of probing one platform's canonical profile URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProbeEvidence {
    pub presence: Presence,
    pub confidence: Confidence,
    /// Free-text note, e.g. "blocked (429) - check manually".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SocialProbeEvidence {
    pub fn unknown(note: impl Into<String>) -> Self {
        Self {
            presence: Presence::Unknown,
            confidence: Confidence::None,
            note: Some(note.into()),
            error: None,
        }
    }

    pub fn present_high() -> Self {
        Self {
            presence: Presence::Present,
            confidence: Confidence::High,
            note: None,
            error: None,
        }
    }

    pub fn absent_high() -> Self {
        Self {
            presence: Presence::Absent,
            confidence: Confidence::High,
            note: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whois_failed_is_not_available() {
        let ev = WhoisEvidence::failed("connection refused");
        assert!(!ev.ok);
        assert!(!ev.likely_available);
        assert!(ev.error.is_some());
    }

    #[test]
    fn test_crt_empty_is_not_an_error() {
        let ev = CrtEvidence::empty();
        assert!(ev.ok);
        assert_eq!(ev.entries, 0);
        assert!(ev.error.is_none());
    }

    #[test]
    fn test_unknown_probe_has_no_confidence() {
        let ev = SocialProbeEvidence::unknown("rate limited");
        assert_eq!(ev.presence, Presence::Unknown);
        assert_eq!(ev.confidence, Confidence::None);
    }
}
