//! External collaborator interfaces: market data retrieval and result
//! persistence.

pub mod market_data;
pub mod persistence;

pub use market_data::{MarketDataProvider, PlaceholderMarketDataProvider};
pub use persistence::{FileResultStore, ResultStore};
