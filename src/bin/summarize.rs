//! Summarize - page-load timing summary from a recording
//!
//! Replays the provider outcomes stored in a recording and prints the resulting
//! summary as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//! ```sh
//! cargo run --bin summarize -- --recording run.json --fan-out
//! ```
//!
//! # Environment Variables
//! - `SUMMARY_FAN_OUT` - Resolve independent metrics concurrently (default: false)
//! - `OBSERVABILITY_ENABLED` - Collect and log run metrics (default: true)

use anyhow::{Context, Result};
use clap::Parser;
use pageload_summary::application::summary::SummaryBuilder;
use pageload_summary::config::Config;
use pageload_summary::domain::computation::ComputationContext;
use pageload_summary::infrastructure::cache::InMemoryComputationCache;
use pageload_summary::infrastructure::observability::SummaryMetrics;
use pageload_summary::infrastructure::recorded::Recording;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, debug, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Page-load timing summary", long_about = None)]
struct Cli {
    /// Recording with raw inputs and per-provider outcomes
    #[arg(short, long)]
    recording: PathBuf,

    /// Resolve independent metrics concurrently
    #[arg(long)]
    fan_out: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut options = config.summary_options();
    options.fan_out |= cli.fan_out;

    let recording = Recording::from_path(&cli.recording)?;
    info!(
        "Loaded recording {} ({} provider outcomes)",
        cli.recording.display(),
        recording.results.len()
    );

    let mut builder = SummaryBuilder::standard(&recording.providers()).with_options(options);
    let metrics = if config.observability.metrics_enabled {
        let metrics = SummaryMetrics::new()?;
        builder = builder.with_metrics(metrics.clone());
        Some(metrics)
    } else {
        None
    };

    let context = ComputationContext::new(Arc::new(InMemoryComputationCache::new()));
    let result = builder.summarize(&recording.inputs, &context).await;

    if let Some(metrics) = metrics {
        debug!("Run metrics:\n{}", metrics.render());
    }

    let output = result.context("Summarization failed")?;
    let json = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", json);

    Ok(())
}
