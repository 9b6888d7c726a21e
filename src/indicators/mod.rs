//! Technical indicator series derived from price history.
//!
//! The data provider may return indicator series directly; when it does not,
//! the pipeline derives the standard set (RSI, MACD, short/long SMA) locally
//! from closing prices. Every series is aligned to the input length; rows
//! without enough history carry a neutral fill so the boosted-tree feature
//! table stays rectangular.

use crate::config::IndicatorParams;
use crate::models::TechnicalIndicatorSet;

/// Simple moving average per row; leading rows use the expanding mean.
pub fn sma_series(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    let mut sum = 0.0;
    for (i, &close) in closes.iter().enumerate() {
        sum += close;
        if i >= period {
            sum -= closes[i - period];
        }
        let window = (i + 1).min(period);
        out.push(sum / window as f64);
    }
    out
}

/// Exponential moving average per row, seeded from the first value.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = match values.first() {
        Some(&v) => v,
        None => return out,
    };
    for &v in values {
        ema = alpha * v + (1.0 - alpha) * ema;
        out.push(ema);
    }
    out
}

/// RSI per row with Wilder smoothing.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// Rows before the first full period are filled with the neutral 50.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![50.0; closes.len()];
    if closes.len() < period + 1 {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += change.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, change.abs())
        };
        avg_gain = (avg_gain * (period as f64 - 1.0) + gain) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + loss) / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// MACD line per row: EMA(fast) - EMA(slow).
pub fn macd_series(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);
    fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect()
}

/// Derive the standard indicator set from closing prices.
pub fn derive(closes: &[f64], params: &IndicatorParams) -> TechnicalIndicatorSet {
    TechnicalIndicatorSet {
        rsi: rsi_series(closes, params.rsi_period),
        macd: macd_series(closes, params.macd_fast, params.macd_slow),
        sma_short: sma_series(closes, params.sma_short),
        sma_long: sma_series(closes, params.sma_long),
    }
}
