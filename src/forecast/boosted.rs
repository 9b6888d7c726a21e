//! Ensemble tree forecaster: gradient-boosted regression trees over raw
//! price and indicator features.
//!
//! Works entirely in price units. Tree splits are scale-invariant, so the
//! feature table is never normalized. The target for row i is the close at
//! row i + 1; the final row has no successor and is excluded from training.

use crate::config::BoostParams;
use crate::error::ForecastError;
use crate::models::{Candle, TechnicalIndicatorSet};

/// Per-row features: OHLCV plus the four indicator columns.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "open", "high", "low", "close", "volume", "rsi", "macd", "sma_short", "sma_long",
];

/// Join price history and indicator series into a rectangular feature table.
///
/// Indicator series are aligned to the tail of the price series; rows before
/// a series starts (or a missing series entirely) are filled with 0.0, which
/// a tree model treats as just another constant.
pub fn build_feature_table(
    candles: &[Candle],
    indicators: &TechnicalIndicatorSet,
) -> Vec<Vec<f64>> {
    let n = candles.len();
    let tail = |series: &[f64], i: usize| -> f64 {
        if series.len() >= n {
            // Longer series keeps only its most recent n values.
            series[series.len() - n + i]
        } else if i >= n - series.len() {
            series[i - (n - series.len())]
        } else {
            0.0
        }
    };

    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                c.open,
                c.high,
                c.low,
                c.close,
                c.volume,
                tail(&indicators.rsi, i),
                tail(&indicators.macd, i),
                tail(&indicators.sma_short, i),
                tail(&indicators.sma_long, i),
            ]
        })
        .collect()
}

/// Next-day close targets: one per row except the last.
pub fn build_targets(candles: &[Candle]) -> Vec<f64> {
    candles.windows(2).map(|pair| pair[1].close).collect()
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Node::Leaf(value) => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }
}

/// Trained state of the boosted-tree forecaster.
#[derive(Debug, Clone)]
pub struct TrainedBoost {
    base: f64,
    learning_rate: f64,
    trees: Vec<Node>,
}

impl TrainedBoost {
    /// Predict next-day closes for each feature row, in price units.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter()
            .map(|row| {
                self.base
                    + self.learning_rate
                        * self.trees.iter().map(|t| t.predict(row)).sum::<f64>()
            })
            .collect()
    }
}

/// Fit gradient-boosted regression trees to the feature table.
///
/// Standard residual boosting: start from the target mean, fit each tree to
/// the current residuals, shrink by the learning rate.
pub fn train(
    rows: &[Vec<f64>],
    targets: &[f64],
    params: &BoostParams,
) -> Result<TrainedBoost, ForecastError> {
    if rows.is_empty() {
        return Err(ForecastError::InvalidInput(
            "no training rows".to_string(),
        ));
    }
    if rows.len() != targets.len() {
        return Err(ForecastError::InvalidInput(format!(
            "feature/target length mismatch: {} rows vs {} targets",
            rows.len(),
            targets.len()
        )));
    }
    let width = rows[0].len();
    if width == 0 || rows.iter().any(|r| r.len() != width) {
        return Err(ForecastError::InvalidInput(
            "feature rows must share a non-zero width".to_string(),
        ));
    }
    if targets.iter().any(|t| !t.is_finite()) {
        return Err(ForecastError::Training(
            "non-finite target value".to_string(),
        ));
    }

    let base = targets.iter().sum::<f64>() / targets.len() as f64;
    let mut predictions = vec![base; targets.len()];
    let mut trees = Vec::with_capacity(params.n_estimators);
    let indices: Vec<usize> = (0..rows.len()).collect();

    for _ in 0..params.n_estimators {
        let residuals: Vec<f64> = targets
            .iter()
            .zip(predictions.iter())
            .map(|(t, p)| t - p)
            .collect();

        let tree = fit_node(rows, &residuals, &indices, params.max_depth);
        for (i, row) in rows.iter().enumerate() {
            predictions[i] += params.learning_rate * tree.predict(row);
        }
        trees.push(tree);
    }

    Ok(TrainedBoost {
        base,
        learning_rate: params.learning_rate,
        trees,
    })
}

fn fit_node(rows: &[Vec<f64>], residuals: &[f64], indices: &[usize], depth: usize) -> Node {
    let mean = indices.iter().map(|&i| residuals[i]).sum::<f64>() / indices.len() as f64;
    if depth == 0 || indices.len() < 2 {
        return Node::Leaf(mean);
    }

    match best_split(rows, residuals, indices) {
        Some((feature, threshold)) => {
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| rows[i][feature] <= threshold);
            if left.is_empty() || right.is_empty() {
                return Node::Leaf(mean);
            }
            Node::Split {
                feature,
                threshold,
                left: Box::new(fit_node(rows, residuals, &left, depth - 1)),
                right: Box::new(fit_node(rows, residuals, &right, depth - 1)),
            }
        }
        None => Node::Leaf(mean),
    }
}

/// Exhaustive variance-reduction split search over every feature.
fn best_split(rows: &[Vec<f64>], residuals: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
    let n = indices.len() as f64;
    let total: f64 = indices.iter().map(|&i| residuals[i]).sum();
    let parent_score = total * total / n;

    let mut best: Option<(usize, f64)> = None;
    let mut best_gain = 1e-12;

    for feature in 0..rows[indices[0]].len() {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (rows[i][feature], residuals[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_sum = 0.0;
        for k in 0..pairs.len() - 1 {
            left_sum += pairs[k].1;
            // Only split between distinct feature values.
            if pairs[k].0 == pairs[k + 1].0 {
                continue;
            }
            let left_n = (k + 1) as f64;
            let right_sum = total - left_sum;
            let right_n = n - left_n;
            let gain =
                left_sum * left_sum / left_n + right_sum * right_sum / right_n - parent_score;
            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, (pairs[k].0 + pairs[k + 1].0) / 2.0));
            }
        }
    }
    best
}
