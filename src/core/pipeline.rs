//! One batch run: screen the universe, forecast the survivors, persist the
//! report.
//!
//! Every per-symbol failure is caught here, logged with the symbol and cause,
//! and excluded from the report; a run never aborts on a symbol. All model
//! state (windows, scale params, trained models) is created fresh per symbol
//! per run and dropped afterwards.

use crate::config::Config;
use crate::error::{ProviderError, Result, SymbolError};
use crate::forecast::orchestrator;
use crate::indicators;
use crate::models::{ForecastResult, RunReport};
use crate::screening;
use crate::services::{MarketDataProvider, ResultStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AnalysisPipeline {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<dyn ResultStore>,
    config: Config,
}

impl AnalysisPipeline {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn ResultStore>,
        config: Config,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Run the full screen-then-forecast pipeline once and persist the
    /// report.
    pub async fn run_once(&self) -> Result<RunReport> {
        let mut report = RunReport::new(Utc::now());
        info!(
            universe = self.config.symbols.len(),
            "starting analysis run over {} symbols",
            self.config.symbols.len()
        );

        for symbol in &self.config.symbols {
            match self.provider.get_fundamentals(symbol).await {
                Ok(metrics) => {
                    if screening::passes(&metrics, &self.config.criteria) {
                        report.filtered_symbols.push(symbol.clone());
                    }
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "excluding {} from screening: {}", symbol, e);
                }
            }
        }
        info!(
            passed = report.filtered_symbols.len(),
            "screening passed {} symbols",
            report.filtered_symbols.len()
        );

        for symbol in report.filtered_symbols.clone() {
            match self.process_symbol(&symbol).await {
                Ok(result) => {
                    info!(symbol = %symbol, "forecast finished for {}", symbol);
                    report.results.insert(symbol, result);
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "skipping forecast for {}: {}", symbol, e);
                }
            }
        }

        self.store.persist(&report)?;
        info!(
            results = report.results.len(),
            "analysis run complete with {} forecasts",
            report.results.len()
        );
        Ok(report)
    }

    async fn process_symbol(&self, symbol: &str) -> std::result::Result<ForecastResult, SymbolError> {
        let candles = self.provider.get_price_history(symbol).await?;
        if candles.is_empty() {
            return Err(ProviderError::Empty {
                symbol: symbol.to_string(),
            }
            .into());
        }

        let mut indicator_set = match self.provider.get_technical_indicators(symbol).await {
            Ok(set) => set,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "indicator retrieval failed for {}, deriving locally", symbol);
                Default::default()
            }
        };
        if indicator_set.is_empty() {
            let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
            indicator_set = indicators::derive(&closes, &self.config.indicators);
        }

        let result =
            orchestrator::forecast(symbol, &candles, &indicator_set, &self.config.forecast)?;
        Ok(result)
    }
}
