//! Pettrack Server
//!
//! Runs the room sensor listener and the dashboard server side by side.
//!
//! Run with: cargo run --bin pettrack -- [--config FILE]
//!
//! # Configuration
//!
//! Config file (TOML), searched in order when `--config` is not given:
//! - `~/.config/pettrack/config.toml`
//! - `/etc/pettrack/config.toml`
//! - `./config.toml`
//!
//! Environment variables override file settings (see `--print-config`).
//! `RUST_LOG` takes precedence over the configured log level.

use anyhow::Context;
use clap::Parser;
use pettrack::api::{self, ApiConfig, AppState};
use pettrack::config::{generate_default_config, Config, LoggingConfig};
use pettrack::ingest::{self, ReportLimits};
use pettrack::tracker::{Analyzer, TrackerResult, TrackerState};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pettrack", version, about = "Home pet tracker server")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    tracing::info!("Starting Pettrack v{}", env!("CARGO_PKG_VERSION"));

    let sensors = config.tracker.sensors()?;
    let tags = config.tracker.tags()?;
    tracing::info!("{} room sensors, {} pet tags", sensors.len(), tags.len());

    let tracker = Arc::new(TrackerState::new(sensors, Analyzer::new(tags)));

    // One signal fans out to both servers
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        api::shutdown_signal().await;
        let _ = stop_tx.send(true);
    });

    let ingest_listener = ingest::bind(&config.ingest)
        .await
        .context("binding sensor listener")?;
    let mut ingest_handle = tokio::spawn(ingest::run(
        ingest_listener,
        Arc::clone(&tracker),
        ReportLimits::from_config(&config.ingest),
        wait_for_stop(stop_rx.clone()),
    ));

    let api_config = ApiConfig::from_config(&config);
    let state = AppState::new(tracker, api_config.clone());
    let dashboard = api::serve(state, &api_config, wait_for_stop(stop_rx));
    tokio::pin!(dashboard);

    // Whichever side stops first, a failure ends the process
    tokio::select! {
        result = &mut dashboard => {
            result?;
            join_ingest((&mut ingest_handle).await)?;
        }
        joined = &mut ingest_handle => {
            join_ingest(joined)?;
            dashboard.as_mut().await?;
        }
    }

    tracing::info!("Pettrack stopped");
    Ok(())
}

/// The accept loop only returns `Ok` once shutdown was signalled
fn join_ingest(joined: Result<TrackerResult<()>, JoinError>) -> anyhow::Result<()> {
    joined
        .context("sensor ingest task panicked")?
        .context("sensor ingest failed")
}

async fn wait_for_stop(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("pettrack={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
