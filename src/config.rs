//! Configuration management.
//!
//! All defaults live in the embedded TOML template; a config file at
//! `./config/nameclaim.toml` overrides it, and CLI flags override both.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file path relative to the working directory.
pub const CONFIG_PATH: &str = "./config/nameclaim.toml";

/// Default configuration content, embedded at build time.
pub const DEFAULT_CONFIG: &str = include_str!("../config/nameclaim.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Configuration field '{field}' cannot be empty")]
    EmptyRequired { field: String },

    #[error("Unknown search provider '{0}' (expected serpapi, duckduckgo, or bing)")]
    UnknownProvider(String),

    #[error("Invalid probe mode '{0}' (expected off, auto, or always)")]
    InvalidProbeMode(String),

    #[error("pipeline.concurrency must be between 1 and 32, got {0}")]
    InvalidConcurrency(usize),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub tlds: TldConfig,
    pub search: SearchConfig,
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// HTTP client configuration shared by all collectors.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
}

/// TLD lists crossed with the normalized base name.
#[derive(Debug, Clone, Deserialize)]
pub struct TldConfig {
    pub global: Vec<String>,
    #[serde(default)]
    pub country: Vec<String>,
    #[serde(default)]
    pub vertical: Vec<String>,
}

impl TldConfig {
    /// Full ordered TLD set: global + country + vertical.
    pub fn all(&self) -> Vec<String> {
        self.global
            .iter()
            .chain(self.country.iter())
            .chain(self.vertical.iter())
            .cloned()
            .collect()
    }
}

/// Search provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Provider priority order; the first one returning results wins.
    pub providers: Vec<String>,
    pub max_results: usize,
    /// API key for the paid provider; also read from SERPAPI_KEY env.
    #[serde(default)]
    pub serpapi_api_key: Option<String>,
}

/// How aggressively social platforms are probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// No social probes.
    Off,
    /// Probe only critical platforms with no search-found record.
    Auto,
    /// Probe every platform in the table.
    Always,
}

impl ProbeMode {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "off" => Ok(ProbeMode::Off),
            "auto" => Ok(ProbeMode::Auto),
            "always" => Ok(ProbeMode::Always),
            other => Err(ConfigError::InvalidProbeMode(other.to_string())),
        }
    }
}

/// Pipeline behavior: filtering policy, enrichment toggles, concurrency.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub probe_mode: ProbeMode,
    pub strict: bool,
    pub allow_mentions: bool,
    pub whois_enabled: bool,
    pub crt_enabled: bool,
    pub only_found: bool,
    pub concurrency: usize,
}

/// Per-source rate limits. A value of 0 disables limiting for that source.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_whois_qps")]
    pub whois_queries_per_second: u32,
    #[serde(default = "default_dns_qps")]
    pub dns_queries_per_second: u32,
    #[serde(default = "default_crt_qps")]
    pub crt_queries_per_second: u32,
    #[serde(default = "default_search_qps")]
    pub search_queries_per_second: u32,
    #[serde(default = "default_social_delay_ms")]
    pub social_probe_delay_ms: u64,
    #[serde(default = "default_stagger_ms")]
    pub enrichment_stagger_ms: u64,
}

fn default_whois_qps() -> u32 {
    2
}
fn default_dns_qps() -> u32 {
    20
}
fn default_crt_qps() -> u32 {
    2
}
fn default_search_qps() -> u32 {
    1
}
fn default_social_delay_ms() -> u64 {
    1500
}
fn default_stagger_ms() -> u64 {
    250
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            whois_queries_per_second: default_whois_qps(),
            dns_queries_per_second: default_dns_qps(),
            crt_queries_per_second: default_crt_qps(),
            search_queries_per_second: default_search_qps(),
            social_probe_delay_ms: default_social_delay_ms(),
            enrichment_stagger_ms: default_stagger_ms(),
        }
    }
}

impl AppConfig {
    /// Load from the standard path, falling back to the embedded defaults
    /// when no config file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Self::default_config()
        }
    }

    /// The embedded default configuration, parsed.
    pub fn default_config() -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "http.user_agent".to_string(),
            });
        }
        for field in [
            ("http.request_timeout_secs", self.http.request_timeout_secs),
            ("http.probe_timeout_secs", self.http.probe_timeout_secs),
            ("http.fetch_timeout_secs", self.http.fetch_timeout_secs),
        ] {
            if field.1 == 0 {
                return Err(ConfigError::EmptyRequired {
                    field: field.0.to_string(),
                });
            }
        }
        if self.tlds.global.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "tlds.global".to_string(),
            });
        }
        if self.search.providers.is_empty() {
            return Err(ConfigError::EmptyRequired {
                field: "search.providers".to_string(),
            });
        }
        for provider in &self.search.providers {
            if !matches!(provider.as_str(), "serpapi" | "duckduckgo" | "bing") {
                return Err(ConfigError::UnknownProvider(provider.clone()));
            }
        }
        if self.search.max_results == 0 {
            return Err(ConfigError::EmptyRequired {
                field: "search.max_results".to_string(),
            });
        }
        if self.pipeline.concurrency == 0 || self.pipeline.concurrency > 32 {
            return Err(ConfigError::InvalidConcurrency(self.pipeline.concurrency));
        }
        Ok(())
    }

    /// Write the default configuration template to the standard location.
    pub fn create_default_config() -> Result<PathBuf, ConfigError> {
        let path = Path::new(CONFIG_PATH);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        Ok(path.to_path_buf())
    }

    /// The SerpApi key from config or environment, if any.
    pub fn serpapi_key(&self) -> Option<String> {
        self.search
            .serpapi_api_key
            .clone()
            .or_else(|| std::env::var("SERPAPI_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}
