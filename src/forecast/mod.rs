//! Dual-model price forecasting: window construction, the two forecasters,
//! and the per-symbol orchestrator.

pub mod boosted;
pub mod orchestrator;
pub mod recurrent;
pub mod window;

pub use orchestrator::forecast;
pub use window::{build_windows, ScaleParams, Window};
