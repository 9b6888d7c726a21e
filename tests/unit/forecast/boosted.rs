//! Unit tests for the boosted-tree forecaster

use chrono::NaiveDate;
use quantsift::config::BoostParams;
use quantsift::forecast::boosted::{build_feature_table, build_targets, train, FEATURE_COLUMNS};
use quantsift::models::{Candle, TechnicalIndicatorSet};

fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Candle::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                c - 0.5,
                c + 1.0,
                c - 1.0,
                c,
                1_000.0,
            )
        })
        .collect()
}

#[test]
fn targets_exclude_final_row() {
    let candles = candles(&[10.0, 11.0, 12.0, 13.0]);
    let targets = build_targets(&candles);
    assert_eq!(targets.len(), candles.len() - 1);
    assert_eq!(targets, vec![11.0, 12.0, 13.0]);
}

#[test]
fn feature_table_is_rectangular_with_missing_indicators() {
    let candles = candles(&[10.0, 11.0, 12.0]);
    let rows = build_feature_table(&candles, &TechnicalIndicatorSet::default());
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.len() == FEATURE_COLUMNS.len()));
    // missing indicator columns are zero-filled
    assert_eq!(rows[0][5], 0.0);
}

#[test]
fn feature_table_aligns_tail_series() {
    let candles = candles(&[10.0, 11.0, 12.0, 13.0]);
    let indicators = TechnicalIndicatorSet {
        rsi: vec![55.0, 60.0],
        ..Default::default()
    };
    let rows = build_feature_table(&candles, &indicators);
    assert_eq!(rows[0][5], 0.0);
    assert_eq!(rows[2][5], 55.0);
    assert_eq!(rows[3][5], 60.0);
}

#[test]
fn feature_table_keeps_only_recent_values_of_longer_series() {
    let candles = candles(&[10.0, 11.0, 12.0]);
    let indicators = TechnicalIndicatorSet {
        rsi: vec![40.0, 45.0, 50.0, 55.0, 60.0],
        ..Default::default()
    };
    let rows = build_feature_table(&candles, &indicators);
    assert_eq!(rows[0][5], 50.0);
    assert_eq!(rows[1][5], 55.0);
    assert_eq!(rows[2][5], 60.0);
}

#[test]
fn fits_close_to_a_linear_relation() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let candles = candles(&closes);
    let rows = build_feature_table(&candles, &TechnicalIndicatorSet::default());
    let targets = build_targets(&candles);
    let model = train(&rows[..targets.len()], &targets, &BoostParams::default()).unwrap();

    let preds = model.predict(&rows[..targets.len()]);
    let mse: f64 = preds
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f64>()
        / targets.len() as f64;
    assert!(mse < 5.0, "boosted trees failed to fit trend, mse = {}", mse);
}

#[test]
fn predictions_stay_in_raw_price_units() {
    let closes: Vec<f64> = (0..40).map(|i| 1_000.0 + i as f64 * 10.0).collect();
    let candles = candles(&closes);
    let rows = build_feature_table(&candles, &TechnicalIndicatorSet::default());
    let targets = build_targets(&candles);
    let model = train(&rows[..targets.len()], &targets, &BoostParams::default()).unwrap();
    let preds = model.predict(&rows);
    // No scaling anywhere: outputs are in the same unit band as the closes.
    assert!(preds.iter().all(|&p| p > 900.0 && p < 1_500.0));
}

#[test]
fn rejects_mismatched_lengths() {
    let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
    let targets = vec![1.0];
    assert!(train(&rows, &targets, &BoostParams::default()).is_err());
}

#[test]
fn rejects_empty_rows() {
    assert!(train(&[], &[], &BoostParams::default()).is_err());
}
