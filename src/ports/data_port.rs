//! Market-data access port trait.
//!
//! The core treats fetched bars as provider output still subject to its own
//! eager validation; retry policy, pagination and rate limiting live behind
//! this boundary, never in the indicator core.

use crate::domain::error::TrisignalError;
use crate::domain::ohlcv::Bar;

/// Lookback period and sampling interval for a fetch, in the provider's
/// own notation (e.g. "1mo" / "15m").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarRequest {
    pub period: String,
    pub interval: String,
}

impl Default for BarRequest {
    fn default() -> Self {
        Self {
            period: "1mo".to_string(),
            interval: "15m".to_string(),
        }
    }
}

pub trait MarketDataPort: Send + Sync {
    /// Fetch the ordered bar sequence for one symbol.
    fn fetch_bars(&self, symbol: &str, request: &BarRequest) -> Result<Vec<Bar>, TrisignalError>;

    fn list_symbols(&self) -> Result<Vec<String>, TrisignalError>;
}
