//! Unit tests for the batch scheduler

use async_trait::async_trait;
use quantsift::config::Config;
use quantsift::core::{AnalysisPipeline, BatchScheduler};
use quantsift::error::{ProviderError, Result};
use quantsift::models::{Candle, FundamentalMetrics, RunReport, TechnicalIndicatorSet};
use quantsift::services::{MarketDataProvider, ResultStore};
use std::sync::Arc;

struct EmptyProvider;

#[async_trait]
impl MarketDataProvider for EmptyProvider {
    async fn get_price_history(&self, symbol: &str) -> std::result::Result<Vec<Candle>, ProviderError> {
        Err(ProviderError::Empty {
            symbol: symbol.to_string(),
        })
    }

    async fn get_fundamentals(
        &self,
        symbol: &str,
    ) -> std::result::Result<FundamentalMetrics, ProviderError> {
        Err(ProviderError::Empty {
            symbol: symbol.to_string(),
        })
    }

    async fn get_technical_indicators(
        &self,
        _symbol: &str,
    ) -> std::result::Result<TechnicalIndicatorSet, ProviderError> {
        Ok(TechnicalIndicatorSet::default())
    }
}

struct NullStore;

impl ResultStore for NullStore {
    fn persist(&self, _report: &RunReport) -> Result<()> {
        Ok(())
    }
}

fn pipeline() -> Arc<AnalysisPipeline> {
    Arc::new(AnalysisPipeline::new(
        Arc::new(EmptyProvider),
        Arc::new(NullStore),
        Config::default(),
    ))
}

#[tokio::test]
async fn rejects_invalid_cron_expression() {
    assert!(BatchScheduler::new(pipeline(), "not a cron").is_err());
}

#[tokio::test]
async fn start_and_stop_toggle_running_state() {
    let scheduler = BatchScheduler::new(pipeline(), "0 0 10 1 * *").unwrap();
    assert!(!scheduler.is_running().await);
    scheduler.start().await;
    assert!(scheduler.is_running().await);
    scheduler.stop().await;
    assert!(!scheduler.is_running().await);
}
