//! Market data provider interface.
//!
//! Retrieval over the network lives outside this crate; the pipeline only
//! depends on this trait. Any call may fail or come back empty, and the
//! caller treats both as "skip this symbol," never as a batch abort.

use crate::error::ProviderError;
use crate::models::{Candle, FundamentalMetrics, TechnicalIndicatorSet};
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get daily price history for a symbol, oldest first.
    async fn get_price_history(&self, symbol: &str) -> Result<Vec<Candle>, ProviderError>;

    /// Get the fundamental snapshot for a symbol.
    async fn get_fundamentals(&self, symbol: &str) -> Result<FundamentalMetrics, ProviderError>;

    /// Get technical indicator series for a symbol. An empty set is valid;
    /// the pipeline derives indicators locally when nothing comes back.
    async fn get_technical_indicators(
        &self,
        symbol: &str,
    ) -> Result<TechnicalIndicatorSet, ProviderError>;
}

/// Provider that returns no data; useful for wiring and tests.
pub struct PlaceholderMarketDataProvider;

#[async_trait]
impl MarketDataProvider for PlaceholderMarketDataProvider {
    async fn get_price_history(&self, symbol: &str) -> Result<Vec<Candle>, ProviderError> {
        Err(ProviderError::Empty {
            symbol: symbol.to_string(),
        })
    }

    async fn get_fundamentals(&self, symbol: &str) -> Result<FundamentalMetrics, ProviderError> {
        Err(ProviderError::Empty {
            symbol: symbol.to_string(),
        })
    }

    async fn get_technical_indicators(
        &self,
        _symbol: &str,
    ) -> Result<TechnicalIndicatorSet, ProviderError> {
        Ok(TechnicalIndicatorSet::default())
    }
}
