use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use month_end_estimator::{render_json, render_text, EstimationPipeline, EstimatorConfig};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Estimate the current month's total transaction volume from a historic ledger
#[derive(Parser, Debug)]
#[command(name = "month-end-estimator", version)]
struct Cli {
    /// Transaction CSV file (overrides the config file's source)
    source: Option<PathBuf>,

    /// Current date as YYYY-MM-DD (defaults to the config file, then today)
    #[arg(long = "current-date")]
    current_date: Option<NaiveDate>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EstimatorConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => EstimatorConfig::new(Local::now().date_naive()),
    };
    if let Some(current_date) = cli.current_date {
        config.current_date = current_date;
    }
    if let Some(source) = cli.source {
        config.source = Some(source);
    }

    let Some(source) = config.source.clone() else {
        bail!("No transaction source given; pass a CSV path or set \"source\" in the config");
    };

    let report = EstimationPipeline::new(config)?
        .run(&source)
        .with_context(|| format!("Failed to estimate from {}", source.display()))?;

    match cli.format {
        Format::Text => print!("{}", render_text(&report)?),
        Format::Json => println!("{}", render_json(&report)?),
    }

    Ok(())
}
