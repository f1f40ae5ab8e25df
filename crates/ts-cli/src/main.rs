//! Timesheet Approvals RS command line
//!
//! Reads a JSON snapshot of timesheets and approver candidates and prints
//! summaries, searches, approver queues and export rows.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ts_core::config::{AppConfig, LoggingConfig};
use ts_db::{InMemoryGateway, Snapshot};
use ts_services::TimesheetWorkflow;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tsa error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let config_result = AppConfig::from_env();
    let logging = match &config_result {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingConfig::default(),
    };
    init_tracing(&logging, cli.verbose);

    let config = config_result.unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        AppConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        snapshot = %cli.snapshot.display(),
        consensus = config.engine.consensus.as_str(),
        "Starting tsa"
    );

    let snapshot = Snapshot::load(&cli.snapshot)
        .await
        .with_context(|| format!("failed to read snapshot {}", cli.snapshot.display()))?;
    debug!(
        timesheets = snapshot.timesheets.len(),
        candidates = snapshot.approver_candidates.len(),
        "Snapshot loaded"
    );

    let gateway = Arc::new(InMemoryGateway::from_snapshot(snapshot));
    let workflow = TimesheetWorkflow::new(gateway, config.engine);

    let rendered = commands::dispatch(&workflow, cli.command, cli.format).await?;
    println!("{rendered}");
    Ok(())
}

/// Initialize tracing/logging on stderr, keeping stdout for command output
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&logging.filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
