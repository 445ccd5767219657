//! Technical indicator types and the indicator capability interface.
//!
//! - `IndicatorPoint`: a single point in an indicator time series; `valid` is
//!   false during the indicator's warm-up window
//! - `IndicatorValue`: enum for the different output shapes
//! - `IndicatorType`: indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: a time series of indicator values
//! - `Indicator`: the capability trait every indicator implements; the
//!   per-symbol pipeline computes a declared list of these into a map

pub mod ema;
pub mod mfi;
pub mod macd;

use crate::domain::ohlcv::Bar;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

impl IndicatorValue {
    /// The scalar payload for single-valued indicators; `None` for
    /// multi-valued shapes like MACD.
    pub fn simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Mfi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn empty(indicator_type: IndicatorType) -> Self {
        Self {
            indicator_type,
            values: Vec::new(),
        }
    }

    /// The value at `index`, or `None` while the indicator is warming up.
    pub fn value_at(&self, index: usize) -> Option<&IndicatorValue> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| &p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Mfi(period) => write!(f, "MFI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// Fixed capability interface for indicators. New indicators implement this
/// and get wired into the pipeline by appearing in its declared list; the
/// synthesizer consumes indicator outputs, never the calculators directly.
pub trait Indicator {
    fn indicator_type(&self) -> IndicatorType;
    fn compute(&self, bars: &[Bar]) -> IndicatorSeries;
}

/// Compute a declared list of indicators over one bar series.
pub fn compute_indicators(
    bars: &[Bar],
    indicators: &[Box<dyn Indicator>],
) -> HashMap<IndicatorType, IndicatorSeries> {
    indicators
        .iter()
        .map(|ind| (ind.indicator_type(), ind.compute(bars)))
        .collect()
}
