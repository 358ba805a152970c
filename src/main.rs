use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nameclaim::cli::{Cli, OutputFormat};
use nameclaim::config::AppConfig;
use nameclaim::export::{self, Report, ReportEntry};
use nameclaim::pipeline::Pipeline;
use nameclaim::score::score_brand;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.init {
        let path = AppConfig::create_default_config().context("writing default config")?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    cli.apply_overrides(&mut config)?;

    let names = cli.collect_names()?;
    if names.is_empty() {
        anyhow::bail!("no names given; pass names as arguments or use --input-file");
    }

    let pipeline = Pipeline::new(config).context("building pipeline")?;
    let mut entries = Vec::new();

    // Names run sequentially; one name's failure never aborts the batch.
    for name in &names {
        match pipeline.run(name).await {
            Ok(verdict) => {
                let score = score_brand(&verdict);
                let entry = ReportEntry { verdict, score };
                export::print_summary(&entry);
                entries.push(entry);
            }
            Err(e) => {
                error!("check failed for {:?}: {:#}", name, e);
            }
        }
    }

    if entries.is_empty() {
        anyhow::bail!("all {} name checks failed", names.len());
    }

    let report = Report::new(entries);
    match cli.format {
        OutputFormat::Csv => export::write_csv(&report, &cli.output_path("csv"))?,
        OutputFormat::Json => export::write_json(&report, &cli.output_path("json"))?,
        OutputFormat::Both => {
            export::write_csv(&report, &cli.output_path("csv"))?;
            export::write_json(&report, &cli.output_path("json"))?;
        }
    }

    info!("checked {} names", report.entries.len());
    Ok(())
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nameclaim={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
