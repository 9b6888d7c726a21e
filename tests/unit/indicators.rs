//! Unit tests for locally derived indicator series

use quantsift::config::IndicatorParams;
use quantsift::indicators::{derive, macd_series, rsi_series, sma_series};

#[test]
fn sma_constant_series() {
    let closes = vec![10.0; 20];
    let sma = sma_series(&closes, 5);
    assert_eq!(sma.len(), 20);
    assert!(sma.iter().all(|&v| (v - 10.0).abs() < 1e-12));
}

#[test]
fn sma_expanding_prefix() {
    let closes = vec![1.0, 2.0, 3.0, 4.0];
    let sma = sma_series(&closes, 3);
    assert!((sma[0] - 1.0).abs() < 1e-12);
    assert!((sma[1] - 1.5).abs() < 1e-12);
    assert!((sma[2] - 2.0).abs() < 1e-12);
    assert!((sma[3] - 3.0).abs() < 1e-12);
}

#[test]
fn rsi_all_gains_saturates() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let rsi = rsi_series(&closes, 14);
    assert_eq!(rsi.len(), 30);
    assert!((rsi[29] - 100.0).abs() < 1e-9);
    // leading fill is neutral
    assert!((rsi[0] - 50.0).abs() < 1e-12);
}

#[test]
fn rsi_short_series_stays_neutral() {
    let closes = vec![100.0, 101.0, 102.0];
    let rsi = rsi_series(&closes, 14);
    assert!(rsi.iter().all(|&v| (v - 50.0).abs() < 1e-12));
}

#[test]
fn macd_positive_in_uptrend() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let macd = macd_series(&closes, 12, 26);
    assert_eq!(macd.len(), 60);
    assert!(macd[59] > 0.0);
}

#[test]
fn derive_aligns_all_series() {
    let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64).sin()).collect();
    let set = derive(&closes, &IndicatorParams::default());
    assert_eq!(set.rsi.len(), 50);
    assert_eq!(set.macd.len(), 50);
    assert_eq!(set.sma_short.len(), 50);
    assert_eq!(set.sma_long.len(), 50);
    assert!(!set.is_empty());
}
