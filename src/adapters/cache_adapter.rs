//! TTL memoization wrapper around a market-data port.
//!
//! Fetches are keyed by (symbol, period, interval) and served from memory
//! until the entry expires. Errors are never cached.

use crate::domain::error::TrisignalError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::{BarRequest, MarketDataPort};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

struct CacheEntry {
    fetched_at: Instant,
    bars: Vec<Bar>,
}

pub struct CacheAdapter<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<(String, String, String), CacheEntry>>,
}

impl<P: MarketDataPort> CacheAdapter<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl(inner: P) -> Self {
        Self::new(inner, DEFAULT_CACHE_TTL)
    }

    fn key(symbol: &str, request: &BarRequest) -> (String, String, String) {
        (
            symbol.to_string(),
            request.period.clone(),
            request.interval.clone(),
        )
    }
}

impl<P: MarketDataPort> MarketDataPort for CacheAdapter<P> {
    fn fetch_bars(&self, symbol: &str, request: &BarRequest) -> Result<Vec<Bar>, TrisignalError> {
        let key = Self::key(symbol, request);

        {
            let entries = self.entries.lock().expect("cache lock poisoned");
            if let Some(entry) = entries.get(&key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.bars.clone());
                }
            }
        }

        let bars = self.inner.fetch_bars(symbol, request)?;
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                bars: bars.clone(),
            },
        );
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrisignalError> {
        self.inner.list_symbols()
    }
}
