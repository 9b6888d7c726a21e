//! Quantsift Worker
//!
//! Runs the screening-and-forecast pipeline on a cron cadence and persists
//! one report per run. Wire a real market data provider in place of the
//! placeholder to go live.

use dotenvy::dotenv;
use quantsift::config::Config;
use quantsift::core::{AnalysisPipeline, BatchScheduler};
use quantsift::logging;
use quantsift::services::{
    FileResultStore, MarketDataProvider, PlaceholderMarketDataProvider, ResultStore,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let config = Config::from_env();
    let env = quantsift::config::get_environment();
    info!("Starting Quantsift Worker");
    info!(environment = %env, "Environment");
    info!(
        symbols = ?config.symbols,
        cron = %config.cron_expr,
        "Universe: {} symbols, cadence '{}'",
        config.symbols.len(),
        config.cron_expr
    );

    if config.symbols.is_empty() {
        return Err("SYMBOLS must name at least one symbol".into());
    }

    let provider: Arc<dyn MarketDataProvider> = Arc::new(PlaceholderMarketDataProvider);
    let store: Arc<dyn ResultStore> = Arc::new(FileResultStore::new(&config.results_dir));

    let run_immediately = config.run_immediately;
    let cron_expr = config.cron_expr.clone();
    let pipeline = Arc::new(AnalysisPipeline::new(provider, store, config));

    if run_immediately {
        info!("RUN_IMMEDIATELY set, running one batch now");
        if let Err(e) = pipeline.run_once().await {
            warn!(error = %e, "immediate run failed: {}", e);
        }
    }

    let scheduler = BatchScheduler::new(pipeline, &cron_expr)?;
    scheduler.start().await;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
