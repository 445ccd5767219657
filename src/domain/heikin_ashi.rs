//! Heikin-Ashi candle transform.
//!
//! HA_close[i] = (O+H+L+C)/4, HA_open[0] = (O[0]+C[0])/2,
//! HA_open[i] = (HA_open[i-1]+HA_close[i-1])/2, high/low clamped to the body.
//! The open recurrence makes the transform strictly sequential per symbol.

use crate::domain::ohlcv::Bar;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct HaBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl HaBar {
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Transform a raw bar sequence into Heikin-Ashi bars of equal length.
///
/// The previous bar's (open, close) pair is the only state carried across
/// the fold; an empty input yields an empty output.
pub fn compute_heikin_ashi(bars: &[Bar]) -> Vec<HaBar> {
    let mut out = Vec::with_capacity(bars.len());
    let mut prev: Option<(f64, f64)> = None;

    for bar in bars {
        let ha_close = (bar.open + bar.high + bar.low + bar.close) / 4.0;
        let ha_open = match prev {
            None => (bar.open + bar.close) / 2.0,
            Some((prev_open, prev_close)) => (prev_open + prev_close) / 2.0,
        };
        let ha_high = bar.high.max(ha_open).max(ha_close);
        let ha_low = bar.low.min(ha_open).min(ha_close);

        prev = Some((ha_open, ha_close));
        out.push(HaBar {
            timestamp: bar.timestamp,
            open: ha_open,
            high: ha_high,
            low: ha_low,
            close: ha_close,
        });
    }

    out
}
