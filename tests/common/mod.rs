#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use trisignal::domain::error::TrisignalError;
pub use trisignal::domain::ohlcv::Bar;
use trisignal::ports::data_port::{BarRequest, MarketDataPort};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str, _request: &BarRequest) -> Result<Vec<Bar>, TrisignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrisignalError::Provider {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrisignalError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn session_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap()
}

pub fn bar_at(symbol: &str, index: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        timestamp: session_start() + chrono::Duration::minutes(15 * index as i64),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Flat-ish close series with a wave, enough history for MACD warm-up.
pub fn wave_bars(symbol: &str, n: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.45).sin() * 8.0;
            bar_at(symbol, i, close - 0.2, close + 1.0, close - 1.0, close, 1500.0)
        })
        .collect()
}

pub fn symbols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}
