//! folkmap query server.
//!
//! Reads configuration from environment variables (see [`config::Config`]),
//! loads and validates the dataset, binds each collection to its metric, then
//! serves the HTTP query API until SIGINT.
//!
//! ## Quick start
//!
//! ```bash
//! FOLKMAP_DATA_DIR=./data FOLKMAP_PORT=8080 \
//!   cargo run --bin folkmap-server --release
//! ```

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use folkmap_dataset::Dataset;

mod api;
mod config;
use api::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    let config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .compact()
        .init();

    info!(
        version          = env!("CARGO_PKG_VERSION"),
        data_dir         = %config.data_dir,
        port             = config.port,
        motif_metric     = %config.motif_metric,
        tradition_metric = %config.tradition_metric,
        "folkmap starting"
    );

    // ── Dataset ───────────────────────────────────────────────────────────────
    // Any integrity problem stops the process here, before serving.
    let dataset = Dataset::load(&config.data_dir)
        .map_err(|e| anyhow::anyhow!("failed to load dataset from {}: {e}", config.data_dir))?;
    let engine = dataset.build_engine(config.motif_metric, config.tradition_metric)?;

    let state = Arc::new(AppState { engine, dataset });

    // ── HTTP ──────────────────────────────────────────────────────────────────
    api::serve(state, config.port).await?;

    info!("folkmap shutdown complete");
    Ok(())
}
