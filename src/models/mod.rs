//! Shared data models spanning the pipeline layers.

pub mod forecast;
pub mod market;

pub use forecast::{ForecastResult, RunReport};
pub use market::{Candle, FundamentalMetrics, TechnicalIndicatorSet};
