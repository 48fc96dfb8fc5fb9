//! # Reclassify
//!
//! Command-line entry point: reads a product CSV, classifies every record
//! through the configured service and writes the table back out with the
//! automatic code and match flag appended.

use anyhow::Context;
use clap::Parser;
use reclassifier::classifier::HttpClassificationClient;
use reclassifier::config::{ConfigManager, ReclassifierConfig};
use reclassifier::logging::{init_structured_logging, log_match_summary};
use reclassifier::models::MatchSummary;
use reclassifier::orchestration::{aggregate, BatchOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "reclassify")]
#[command(about = "Reclassify product records into the four-level taxonomy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Input CSV (header row plus seven columns per record)
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV; overwritten if it exists
    #[arg(short, long)]
    output: PathBuf,

    /// Configuration directory (default: config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment name (default: RECLASSIFIER_ENV, APP_ENV, then development)
    #[arg(short, long)]
    environment: Option<String>,

    /// Override the classification service endpoint
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(ConfigManager::detect_environment);
    let manager = ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
        .context("failed to load configuration")?;

    let config = effective_config(manager.config(), &cli);
    init_structured_logging(&config.logging, manager.environment());

    let table = reclassifier::io::read_records(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let client = HttpClassificationClient::new(&config.classifier)
        .context("failed to build classification client")?;
    info!(endpoint = %client.endpoint(), "🔌 Classification client ready");

    let orchestrator = BatchOrchestrator::from_config(Arc::new(client), &config);
    let run = orchestrator.run(table.records).await;

    let rows = aggregate(&run.records);
    reclassifier::io::write_output(&cli.output, &table.header, &run.records, &rows)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    log_match_summary(&MatchSummary::from_rows(&rows));
    Ok(())
}

fn effective_config(loaded: &ReclassifierConfig, cli: &Cli) -> ReclassifierConfig {
    let mut config = loaded.clone();
    if let Some(endpoint) = &cli.endpoint {
        config.classifier.endpoint = endpoint.clone();
    }
    config
}
