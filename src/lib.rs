//! trisignal — multi-symbol trading signal analyzer.
//!
//! Converts raw OHLCV bar series into classified trading signals by combining
//! Heikin-Ashi Doji detection, the Money Flow Index and MACD crossovers.
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
