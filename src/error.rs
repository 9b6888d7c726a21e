//! Typed errors for the screening and forecast pipeline.
//!
//! Per-symbol failures (`ProviderError`, `ForecastError`) are recovered at
//! the pipeline boundary; `PipelineError::Config` is fatal at startup.

use thiserror::Error;

/// Market data retrieval failures; recovered per symbol.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("data unavailable for {symbol}: {reason}")]
    Unavailable { symbol: String, reason: String },

    #[error("provider returned empty data for {symbol}")]
    Empty { symbol: String },
}

/// Model construction and training failures; recovered per symbol.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("insufficient data: need more than {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("training failed: {0}")]
    Training(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Either way a symbol can drop out of a run; recovered at the pipeline
/// boundary.
#[derive(Error, Debug)]
pub enum SymbolError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Run-level failures.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid cron expression '{expr}': {reason}")]
    Schedule { expr: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
