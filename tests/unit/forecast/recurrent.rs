//! Unit tests for the sequential forecaster

use quantsift::config::RecurrentParams;
use quantsift::forecast::recurrent::train;
use quantsift::forecast::{build_windows, Window};

// Smaller than the production defaults so the fit stays fast in debug builds.
fn small_params() -> RecurrentParams {
    RecurrentParams {
        hidden_sizes: [16, 8],
        dropout: 0.1,
        epochs: 80,
        batch_size: 8,
        learning_rate: 0.01,
    }
}

#[test]
fn rejects_empty_windows() {
    assert!(train(&[], &small_params()).is_err());
}

#[test]
fn rejects_mismatched_window_lengths() {
    let windows = vec![
        Window {
            inputs: vec![0.1, 0.2],
            target: 0.3,
        },
        Window {
            inputs: vec![0.1],
            target: 0.2,
        },
    ];
    assert!(train(&windows, &small_params()).is_err());
}

#[test]
fn rejects_invalid_dropout() {
    let windows = vec![Window {
        inputs: vec![0.1, 0.2],
        target: 0.3,
    }];
    let params = RecurrentParams {
        dropout: 1.0,
        ..small_params()
    };
    assert!(train(&windows, &params).is_err());
}

#[test]
fn rejects_zero_hidden_size() {
    let closes: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let (windows, _) = build_windows(&closes, 4).unwrap();
    let params = RecurrentParams {
        hidden_sizes: [16, 0],
        ..small_params()
    };
    assert!(train(&windows, &params).is_err());
    let params = RecurrentParams {
        hidden_sizes: [0, 8],
        ..small_params()
    };
    assert!(train(&windows, &params).is_err());
}

#[test]
fn learns_monotone_trend_within_scaled_range() {
    let closes: Vec<f64> = (0..90).map(|i| 100.0 + i as f64).collect();
    let (windows, _) = build_windows(&closes, 60).unwrap();
    let model = train(&windows, &small_params()).unwrap();
    let preds = model.predict(&windows);
    assert_eq!(preds.len(), windows.len());
    // Scaled targets live in [2/3, 1]; a converged fit stays near them.
    for p in preds {
        assert!(p > 0.3 && p < 1.3, "prediction {} outside sane band", p);
    }
}

#[test]
fn predict_is_deterministic_for_a_trained_state() {
    let closes: Vec<f64> = (0..40)
        .map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0)
        .collect();
    let (windows, _) = build_windows(&closes, 10).unwrap();
    let model = train(&windows, &small_params()).unwrap();
    assert_eq!(model.predict(&windows), model.predict(&windows));
}

#[test]
fn trained_state_is_an_explicit_value() {
    let closes: Vec<f64> = (0..30).map(|i| 10.0 + i as f64).collect();
    let (windows, _) = build_windows(&closes, 5).unwrap();
    // Two fits are two independent states; predicting with either works.
    let a = train(&windows, &small_params()).unwrap();
    let b = train(&windows, &small_params()).unwrap();
    assert_eq!(a.predict(&windows).len(), windows.len());
    assert_eq!(b.predict(&windows).len(), windows.len());
}
