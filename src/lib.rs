//! Evidence aggregation and match classification for brand-name checks.
//!
//! Given a candidate name, the pipeline probes candidate domains (DNS, WHOIS,
//! certificate transparency), searches the web for existing usage, probes
//! social platform handles, then classifies, deduplicates, and scores the
//! combined evidence into a per-name verdict and brand viability score.

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod config;
pub mod crt;
pub mod dns;
pub mod evidence;
pub mod export;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod platforms;
pub mod provenance;
pub mod rate_limit;
pub mod record;
pub mod score;
pub mod search;
pub mod social;
pub mod whois;

pub use config::AppConfig;
pub use pipeline::Pipeline;
pub use record::{MatchType, Record, UsageVerdict};
pub use score::{score_brand, BrandScore, Grade};
