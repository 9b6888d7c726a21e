//! Forecast output types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Side-by-side forecast for one symbol. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub symbol: String,
    /// Headline prediction from the recurrent model, in price units.
    pub sequential_prediction: f64,
    /// Headline prediction from the boosted-tree model, in price units.
    pub tree_prediction: f64,
    pub current_price: f64,
    pub pct_change_sequential: f64,
    pub pct_change_tree: f64,
}

/// Outcome of one scheduled run over the symbol universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub filtered_symbols: Vec<String>,
    pub results: BTreeMap<String, ForecastResult>,
}

impl RunReport {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            filtered_symbols: Vec::new(),
            results: BTreeMap::new(),
        }
    }
}
