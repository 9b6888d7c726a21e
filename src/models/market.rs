//! Market data types consumed by the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Fundamental snapshot for one symbol, produced by the data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    pub market_cap: f64,
    pub roe: f64,
    pub pe: f64,
    pub debt_to_equity: f64,
    pub eps: f64,
}

/// Technical indicator series aligned to the tail of the price series.
///
/// A missing indicator is an empty vec, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalIndicatorSet {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rsi: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub macd: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sma_short: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sma_long: Vec<f64>,
}

impl TechnicalIndicatorSet {
    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
            && self.macd.is_empty()
            && self.sma_short.is_empty()
            && self.sma_long.is_empty()
    }
}
