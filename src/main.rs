use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendlens::config::Config;
use trendlens::models::RunMode;

mod commands;

use commands::{analyze, AnalyzeParams};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(
    name = "trendlens",
    version,
    about = "Search-interest analysis for a keyword over time and by region",
    long_about = None
)]
struct Cli {
    /// Analysis to run (weekly, daily-year, daily-12m); shows a menu when omitted
    #[arg(short, long, value_parser = parse_mode)]
    mode: Option<RunMode>,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for CSV exports and charts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of regions drawn in the regional chart
    #[arg(long)]
    top_n: Option<usize>,

    /// Skip chart rendering
    #[arg(long, default_value = "false")]
    no_charts: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long)]
    log_format: Option<String>,
}

fn parse_mode(value: &str) -> Result<RunMode, String> {
    RunMode::from_name(value)
        .ok_or_else(|| format!("unknown mode '{value}' (expected weekly, daily-year, daily-12m)"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;
    trendlens::i18n::init_from_env();

    tracing::info!(
        keyword = %config.query.keyword,
        geo = %config.query.geo,
        output_dir = %config.output.dir.display(),
        "trendlens starting"
    );

    let report = analyze(AnalyzeParams {
        config,
        mode: cli.mode,
    })
    .await?;

    tracing::info!(
        rows = report.series_rows,
        regions = report.regions,
        files = report.exports.len() + report.charts.len(),
        "trendlens completed"
    );
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(top_n) = cli.top_n {
        config.output.regional_top_n = top_n;
    }
    if cli.no_charts {
        config.output.charts = false;
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("trendlens=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("trendlens={level},warn"))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
