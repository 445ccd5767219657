//! OHLCV bar representation and sequence validation.

use crate::domain::error::TrisignalError;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// Validate a bar sequence before any indicator computation.
///
/// Checks strictly increasing timestamps, positive finite prices and
/// non-negative finite volume. An empty sequence is valid (it produces
/// empty outputs downstream, never an error).
pub fn validate_bars(symbol: &str, bars: &[Bar]) -> Result<(), TrisignalError> {
    for (i, bar) in bars.iter().enumerate() {
        for (name, price) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !price.is_finite() || price <= 0.0 {
                return Err(TrisignalError::InvalidBarSequence {
                    symbol: symbol.to_string(),
                    index: i,
                    reason: format!("{name} price {price} is not a positive finite number"),
                });
            }
        }
        if !bar.volume.is_finite() || bar.volume < 0.0 {
            return Err(TrisignalError::InvalidBarSequence {
                symbol: symbol.to_string(),
                index: i,
                reason: format!("volume {} is negative or not finite", bar.volume),
            });
        }
        if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
            return Err(TrisignalError::InvalidBarSequence {
                symbol: symbol.to_string(),
                index: i,
                reason: "timestamps not strictly increasing".into(),
            });
        }
    }
    Ok(())
}
