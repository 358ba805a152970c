//! Command-line interface.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{AppConfig, ProbeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Both,
}

#[derive(Parser, Debug)]
#[command(
    name = "nameclaim",
    version,
    about = "Check whether a brand name is already in use across domains and social platforms"
)]
pub struct Cli {
    /// Names to check
    pub names: Vec<String>,

    /// Read names from a file, one per line
    #[arg(long, value_name = "FILE")]
    pub input_file: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    pub init: bool,

    /// Path to the configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep only exact matches
    #[arg(long)]
    pub strict: bool,

    /// Keep mention-type matches
    #[arg(long)]
    pub allow_mentions: bool,

    /// Social probe mode: off, auto, or always
    #[arg(long, value_name = "MODE")]
    pub probe_mode: Option<String>,

    /// Skip WHOIS lookups
    #[arg(long)]
    pub no_whois: bool,

    /// Skip certificate transparency lookups
    #[arg(long)]
    pub no_crt: bool,

    /// Drop records with no usage evidence
    #[arg(long)]
    pub only_found: bool,

    /// Search provider priority, comma separated (serpapi, duckduckgo, bing)
    #[arg(long, value_name = "LIST")]
    pub providers: Option<String>,

    /// Maximum search results per name
    #[arg(long, value_name = "N")]
    pub max_results: Option<usize>,

    /// Concurrent in-flight operations per name
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Report path (extension added per format)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) -> Result<()> {
        if self.strict {
            config.pipeline.strict = true;
        }
        if self.allow_mentions {
            config.pipeline.allow_mentions = true;
        }
        if let Some(mode) = &self.probe_mode {
            config.pipeline.probe_mode = ProbeMode::parse(mode)?;
        }
        if self.no_whois {
            config.pipeline.whois_enabled = false;
        }
        if self.no_crt {
            config.pipeline.crt_enabled = false;
        }
        if self.only_found {
            config.pipeline.only_found = true;
        }
        if let Some(providers) = &self.providers {
            config.search.providers = providers
                .split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect();
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }
        if let Some(concurrency) = self.concurrency {
            config.pipeline.concurrency = concurrency;
        }
        config.validate()?;
        Ok(())
    }

    /// Collect names from positional arguments and the optional input file.
    pub fn collect_names(&self) -> Result<Vec<String>> {
        let mut names = self.names.clone();
        if let Some(path) = &self.input_file {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            names.extend(
                contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(str::to_string),
            );
        }
        let mut seen = std::collections::HashSet::new();
        names.retain(|n| seen.insert(n.clone()));
        Ok(names)
    }

    /// Chosen output path, or a timestamped file in the home directory.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        if let Some(path) = &self.output {
            return path.with_extension(extension);
        }
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        dir.join(format!("nameclaim_report_{}.{}", stamp, extension))
    }
}
