//! Drives both forecasters for one symbol and reconciles their outputs.

use crate::config::ForecastConfig;
use crate::error::ForecastError;
use crate::forecast::{boosted, recurrent, window};
use crate::models::{Candle, ForecastResult, TechnicalIndicatorSet};
use tracing::debug;

/// Train both models on one symbol's history and produce the side-by-side
/// forecast.
///
/// NOTE: the forward estimate is taken from the trailing `horizon` slice of
/// *already-observed* windows/rows, mirroring the behavior of the system this
/// replaces. That makes it an in-sample backward-looking estimate, not a
/// recursive multi-step forecast past the last known date; downstream
/// consumers depend on these semantics.
pub fn forecast(
    symbol: &str,
    candles: &[Candle],
    indicators: &TechnicalIndicatorSet,
    cfg: &ForecastConfig,
) -> Result<ForecastResult, ForecastError> {
    if candles.is_empty() {
        return Err(ForecastError::InsufficientData {
            required: cfg.lookback,
            actual: 0,
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let current_price = *closes.last().unwrap_or(&0.0);
    if current_price == 0.0 {
        return Err(ForecastError::InvalidInput(
            "latest close is zero".to_string(),
        ));
    }

    // Sequential model: scaled windows, predictions inverse-transformed with
    // the same fit captured during window construction.
    let (windows, scale) = window::build_windows(&closes, cfg.lookback)?;
    let sequential = recurrent::train(&windows, &cfg.recurrent)?;
    let tail_start = windows.len().saturating_sub(cfg.horizon);
    let sequential_preds: Vec<f64> = sequential
        .predict(&windows[tail_start..])
        .into_iter()
        .map(|p| scale.inverse(p))
        .collect();

    // Tree model: raw-unit features, final row excluded from training but
    // included in the prediction slice.
    let rows = boosted::build_feature_table(candles, indicators);
    let targets = boosted::build_targets(candles);
    let boost = boosted::train(&rows[..targets.len()], &targets, &cfg.boost)?;
    let row_tail = rows.len().saturating_sub(cfg.horizon);
    let tree_preds = boost.predict(&rows[row_tail..]);

    let sequential_prediction = *sequential_preds.last().ok_or_else(|| {
        ForecastError::Training("sequential model produced no predictions".to_string())
    })?;
    let tree_prediction = *tree_preds.last().ok_or_else(|| {
        ForecastError::Training("tree model produced no predictions".to_string())
    })?;

    debug!(
        symbol = %symbol,
        sequential = sequential_prediction,
        tree = tree_prediction,
        current = current_price,
        "forecast complete for {}",
        symbol
    );

    Ok(ForecastResult {
        symbol: symbol.to_string(),
        sequential_prediction,
        tree_prediction,
        current_price,
        pct_change_sequential: (sequential_prediction / current_price - 1.0) * 100.0,
        pct_change_tree: (tree_prediction / current_price - 1.0) * 100.0,
    })
}
