//! Unit tests for the forecast orchestrator

use chrono::NaiveDate;
use quantsift::config::{ForecastConfig, RecurrentParams};
use quantsift::error::ForecastError;
use quantsift::forecast::forecast;
use quantsift::models::{Candle, TechnicalIndicatorSet};

fn daily_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Candle::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                c,
                c + 0.5,
                c - 0.5,
                c,
                10_000.0,
            )
        })
        .collect()
}

fn test_cfg() -> ForecastConfig {
    ForecastConfig {
        lookback: 60,
        horizon: 30,
        recurrent: RecurrentParams {
            hidden_sizes: [16, 8],
            dropout: 0.1,
            epochs: 60,
            batch_size: 8,
            learning_rate: 0.01,
        },
        ..Default::default()
    }
}

#[test]
fn empty_series_is_insufficient() {
    let err = forecast("AAPL", &[], &TechnicalIndicatorSet::default(), &test_cfg());
    assert!(matches!(
        err,
        Err(ForecastError::InsufficientData { actual: 0, .. })
    ));
}

#[test]
fn short_series_is_insufficient() {
    let candles = daily_candles(&vec![100.0; 40]);
    let err = forecast(
        "AAPL",
        &candles,
        &TechnicalIndicatorSet::default(),
        &test_cfg(),
    );
    assert!(matches!(err, Err(ForecastError::InsufficientData { .. })));
}

#[test]
fn monotone_rise_yields_in_range_predictions() {
    // 90 daily closes rising from 100 to 189; lookback 60 gives 30 windows.
    let closes: Vec<f64> = (0..90).map(|i| 100.0 + i as f64).collect();
    let candles = daily_candles(&closes);
    let result = forecast(
        "AAPL",
        &candles,
        &TechnicalIndicatorSet::default(),
        &test_cfg(),
    )
    .unwrap();

    assert_eq!(result.symbol, "AAPL");
    assert_eq!(result.current_price, 189.0);
    // Sanity bound: in-sample predictions land inside the observed range
    // (small tolerance for the stochastic fit).
    let lo = 100.0 * 0.95;
    let hi = 189.0 * 1.05;
    assert!(
        result.sequential_prediction > lo && result.sequential_prediction < hi,
        "sequential prediction {} outside [{}, {}]",
        result.sequential_prediction,
        lo,
        hi
    );
    assert!(
        result.tree_prediction > lo && result.tree_prediction < hi,
        "tree prediction {} outside [{}, {}]",
        result.tree_prediction,
        lo,
        hi
    );

    let expected_seq = (result.sequential_prediction / 189.0 - 1.0) * 100.0;
    let expected_tree = (result.tree_prediction / 189.0 - 1.0) * 100.0;
    assert!((result.pct_change_sequential - expected_seq).abs() < 1e-9);
    assert!((result.pct_change_tree - expected_tree).abs() < 1e-9);
}

#[test]
fn provided_indicators_are_used_as_is() {
    let closes: Vec<f64> = (0..75).map(|i| 200.0 + (i as f64 * 0.2).cos() * 3.0).collect();
    let candles = daily_candles(&closes);
    let indicators = TechnicalIndicatorSet {
        rsi: vec![55.0; 75],
        macd: vec![0.5; 75],
        sma_short: closes.clone(),
        sma_long: closes.clone(),
    };
    let result = forecast("MSFT", &candles, &indicators, &test_cfg()).unwrap();
    assert!(result.tree_prediction.is_finite());
    assert!(result.sequential_prediction.is_finite());
}
