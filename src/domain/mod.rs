//! Core domain types and logic.

pub mod ohlcv;
pub mod heikin_ashi;
pub mod doji;
pub mod indicator;
pub mod signal;
pub mod analysis;
pub mod coordinator;
pub mod universe;
pub mod config_validation;
pub mod error;
