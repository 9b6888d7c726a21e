//! Environment-based configuration for the screening and forecast pipeline.
//!
//! Every run consumes an immutable `Config` value; thresholds are never
//! mutated in place after startup. Unrecognized environment variables are
//! ignored; malformed recognized values fall back to defaults.

use std::env;

/// Get the current environment (production, sandbox, development)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// Fundamental thresholds a symbol must satisfy to survive screening.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningCriteria {
    pub market_cap_min: f64,
    pub roe_min: f64,
    pub pe_max: f64,
    pub debt_equity_max: f64,
}

impl Default for ScreeningCriteria {
    fn default() -> Self {
        Self {
            market_cap_min: 5_000_000_000.0,
            roe_min: 0.15,
            pe_max: 25.0,
            debt_equity_max: 0.5,
        }
    }
}

/// Hyperparameters for the recurrent forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentParams {
    pub hidden_sizes: [usize; 2],
    pub dropout: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Default for RecurrentParams {
    fn default() -> Self {
        Self {
            hidden_sizes: [64, 32],
            dropout: 0.2,
            epochs: 100,
            batch_size: 32,
            learning_rate: 0.005,
        }
    }
}

/// Hyperparameters for the gradient-boosted tree forecaster.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostParams {
    pub max_depth: usize,
    pub learning_rate: f64,
    pub n_estimators: usize,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            max_depth: 6,
            learning_rate: 0.1,
            n_estimators: 100,
        }
    }
}

/// Periods for the locally derived technical indicator series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: 50,
            sma_long: 200,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

/// Window construction and forecast horizon settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    pub lookback: usize,
    pub horizon: usize,
    pub recurrent: RecurrentParams,
    pub boost: BoostParams,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback: 60,
            horizon: 30,
            recurrent: RecurrentParams::default(),
            boost: BoostParams::default(),
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbol universe to screen on each run.
    pub symbols: Vec<String>,
    /// Directory where run reports are persisted.
    pub results_dir: String,
    /// Cron expression for the batch cadence (sec min hour day month weekday).
    pub cron_expr: String,
    /// Run one batch immediately on startup in addition to the schedule.
    pub run_immediately: bool,
    pub criteria: ScreeningCriteria,
    pub forecast: ForecastConfig,
    pub indicators: IndicatorParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: vec![
                "AAPL".to_string(),
                "MSFT".to_string(),
                "GOOGL".to_string(),
            ],
            results_dir: "results".to_string(),
            // 10:00 on the 1st of every month
            cron_expr: "0 0 10 1 * *".to_string(),
            run_immediately: false,
            criteria: ScreeningCriteria::default(),
            forecast: ForecastConfig::default(),
            indicators: IndicatorParams::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let symbols = env::var("SYMBOLS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_uppercase())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.symbols);

        Self {
            symbols,
            results_dir: env::var("RESULTS_DIR").unwrap_or(defaults.results_dir),
            cron_expr: env::var("SCHEDULE_CRON").unwrap_or(defaults.cron_expr),
            run_immediately: env_parse("RUN_IMMEDIATELY", defaults.run_immediately),
            criteria: ScreeningCriteria {
                market_cap_min: env_parse("MARKET_CAP_MIN", defaults.criteria.market_cap_min),
                roe_min: env_parse("ROE_MIN", defaults.criteria.roe_min),
                pe_max: env_parse("PE_MAX", defaults.criteria.pe_max),
                debt_equity_max: env_parse("DEBT_EQUITY_MAX", defaults.criteria.debt_equity_max),
            },
            forecast: ForecastConfig {
                lookback: env_parse("LOOKBACK_PERIOD", defaults.forecast.lookback),
                horizon: env_parse("PREDICTION_DAYS", defaults.forecast.horizon),
                recurrent: RecurrentParams {
                    hidden_sizes: [
                        env_parse("RNN_HIDDEN_1", defaults.forecast.recurrent.hidden_sizes[0]),
                        env_parse("RNN_HIDDEN_2", defaults.forecast.recurrent.hidden_sizes[1]),
                    ],
                    dropout: env_parse("RNN_DROPOUT", defaults.forecast.recurrent.dropout),
                    epochs: env_parse("RNN_EPOCHS", defaults.forecast.recurrent.epochs),
                    batch_size: env_parse("RNN_BATCH_SIZE", defaults.forecast.recurrent.batch_size),
                    learning_rate: env_parse(
                        "RNN_LEARNING_RATE",
                        defaults.forecast.recurrent.learning_rate,
                    ),
                },
                boost: BoostParams {
                    max_depth: env_parse("GBT_MAX_DEPTH", defaults.forecast.boost.max_depth),
                    learning_rate: env_parse(
                        "GBT_LEARNING_RATE",
                        defaults.forecast.boost.learning_rate,
                    ),
                    n_estimators: env_parse(
                        "GBT_N_ESTIMATORS",
                        defaults.forecast.boost.n_estimators,
                    ),
                },
            },
            indicators: IndicatorParams {
                sma_short: env_parse("SMA_SHORT_PERIOD", defaults.indicators.sma_short),
                sma_long: env_parse("SMA_LONG_PERIOD", defaults.indicators.sma_long),
                rsi_period: env_parse("RSI_PERIOD", defaults.indicators.rsi_period),
                macd_fast: env_parse("MACD_FAST_PERIOD", defaults.indicators.macd_fast),
                macd_slow: env_parse("MACD_SLOW_PERIOD", defaults.indicators.macd_slow),
                macd_signal: env_parse("MACD_SIGNAL_PERIOD", defaults.indicators.macd_signal),
            },
        }
    }
}
