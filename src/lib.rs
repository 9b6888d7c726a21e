//! Quantsift: stock screening and dual-model price forecasting.
//!
//! The pipeline screens an equity universe against fundamental thresholds,
//! then forecasts near-term closing prices for the survivors with two
//! independently trained models (a recurrent network and a gradient-boosted
//! tree ensemble), persisting one report per scheduled run.

pub mod config;
pub mod core;
pub mod error;
pub mod forecast;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod screening;
pub mod services;
