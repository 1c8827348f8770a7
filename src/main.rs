//! Rheinpegel exporter - main binary
//!
//! Polls the PEGELONLINE API for one station and serves the latest water
//! level and trend as Prometheus gauges.
//!
//! Usage:
//!   cargo run --release                                   # KÖLN, every 15m, :8080
//!   cargo run --release -- --location BONN --every 5m
//!   cargo run --release -- --listen-address 127.0.0.1:9100

use anyhow::Context;
use clap::Parser;
use rheinpegel_exporter::config::Cli;
use rheinpegel_exporter::daemon::Daemon;
use rheinpegel_exporter::endpoint::Exporter;
use rheinpegel_exporter::ingest::pegelonline::Fetcher;
use rheinpegel_exporter::monitor::MetricStore;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log_level)
                .with_context(|| format!("invalid log level {:?}", cli.log_level))?,
        )
        .init();

    let config = cli.into_config()?;

    let store = Arc::new(MetricStore::new()?);
    let fetcher = Fetcher::new().context("failed to build HTTP client")?;
    let daemon = Daemon::new(config.location.clone(), fetcher, Arc::clone(&store));

    // Runs the first poll before returning, so the first scrape has data.
    let _scheduler = daemon
        .start(config.every)
        .context("failed to start poll loop")?;

    let exporter = Exporter::bind(config.listen_address, store)?;
    exporter.serve();

    Ok(())
}
