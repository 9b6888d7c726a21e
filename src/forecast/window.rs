//! Lookback window construction with a reversible min-max scale transform.

use crate::error::ForecastError;

/// Min-max scale parameters, fitted once per symbol per run and reused for
/// every inverse transform of that symbol's predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub min: f64,
    pub max: f64,
}

impl ScaleParams {
    /// Fit over the full series. A degenerate series (max == min) scales
    /// everything to 0.0 and inverse-transforms back to `min`.
    pub fn fit(values: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
        Self { min, max }
    }

    pub fn scale(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) / range
    }

    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }
}

/// One training example: `lookback` scaled closes and the scaled next value.
#[derive(Debug, Clone)]
pub struct Window {
    pub inputs: Vec<f64>,
    pub target: f64,
}

/// Build fixed-length lookback windows over a closing-price series.
///
/// Fits the scale transform once over the whole series, then emits one window
/// per index in `[lookback, len)`, so exactly `len - lookback` windows.
/// A series no longer than the lookback cannot produce a single window and is
/// reported as `InsufficientData`, never as an empty success.
pub fn build_windows(
    closes: &[f64],
    lookback: usize,
) -> Result<(Vec<Window>, ScaleParams), ForecastError> {
    if lookback == 0 {
        return Err(ForecastError::InvalidInput(
            "lookback must be at least 1".to_string(),
        ));
    }
    if closes.len() <= lookback {
        return Err(ForecastError::InsufficientData {
            required: lookback,
            actual: closes.len(),
        });
    }

    let params = ScaleParams::fit(closes);
    let scaled: Vec<f64> = closes.iter().map(|&c| params.scale(c)).collect();

    let mut windows = Vec::with_capacity(scaled.len() - lookback);
    for i in lookback..scaled.len() {
        windows.push(Window {
            inputs: scaled[i - lookback..i].to_vec(),
            target: scaled[i],
        });
    }

    Ok((windows, params))
}
