//! Fundamental screening of a symbol universe.

use crate::config::ScreeningCriteria;
use crate::models::FundamentalMetrics;

/// Check whether a symbol's fundamentals satisfy the screening criteria.
///
/// Boundary equality passes on every threshold. Criteria are an explicit
/// argument so callers can screen against ad hoc thresholds without touching
/// shared state.
pub fn passes(metrics: &FundamentalMetrics, criteria: &ScreeningCriteria) -> bool {
    metrics.market_cap >= criteria.market_cap_min
        && metrics.roe >= criteria.roe_min
        && metrics.pe <= criteria.pe_max
        && metrics.debt_to_equity <= criteria.debt_equity_max
}
