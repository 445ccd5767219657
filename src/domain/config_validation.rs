//! Configuration validation and loading.
//!
//! Validates all recognized options eagerly before any analysis runs, then
//! builds the typed config structs from the same port.

use crate::domain::analysis::AnalysisConfig;
use crate::domain::coordinator::CoordinatorConfig;
use crate::domain::error::TrisignalError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::BarRequest;
use std::time::Duration;

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TrisignalError {
    TrisignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TrisignalError> {
    validate_doji_threshold(config)?;
    validate_mfi(config)?;
    validate_macd(config)?;
    validate_runtime(config)?;
    Ok(())
}

fn validate_doji_threshold(config: &dyn ConfigPort) -> Result<(), TrisignalError> {
    let value = config.get_double("signals", "doji_threshold", 0.1);
    if !(0.05..=0.3).contains(&value) {
        return Err(invalid(
            "signals",
            "doji_threshold",
            format!("{value} outside the accepted range 0.05-0.3"),
        ));
    }
    Ok(())
}

fn validate_mfi(config: &dyn ConfigPort) -> Result<(), TrisignalError> {
    let period = config.get_int("signals", "mfi_period", 14);
    if period < 1 {
        return Err(invalid("signals", "mfi_period", "must be at least 1"));
    }

    let oversold = config.get_double("signals", "mfi_oversold", 30.0);
    if !(10.0..=40.0).contains(&oversold) {
        return Err(invalid(
            "signals",
            "mfi_oversold",
            format!("{oversold} outside the accepted range 10-40"),
        ));
    }

    let overbought = config.get_double("signals", "mfi_overbought", 70.0);
    if !(60.0..=90.0).contains(&overbought) {
        return Err(invalid(
            "signals",
            "mfi_overbought",
            format!("{overbought} outside the accepted range 60-90"),
        ));
    }
    Ok(())
}

fn validate_macd(config: &dyn ConfigPort) -> Result<(), TrisignalError> {
    let fast = config.get_int("signals", "macd_fast", 12);
    let slow = config.get_int("signals", "macd_slow", 26);
    let signal = config.get_int("signals", "macd_signal", 9);

    for (key, value) in [("macd_fast", fast), ("macd_slow", slow), ("macd_signal", signal)] {
        if value < 1 {
            return Err(invalid("signals", key, "must be at least 1"));
        }
    }
    if fast >= slow {
        return Err(invalid(
            "signals",
            "macd_fast",
            format!("fast period {fast} must be smaller than slow period {slow}"),
        ));
    }
    Ok(())
}

fn validate_runtime(config: &dyn ConfigPort) -> Result<(), TrisignalError> {
    let pool = config.get_int("runtime", "worker_pool_size", 0);
    if pool < 0 {
        return Err(invalid("runtime", "worker_pool_size", "must not be negative"));
    }

    let timeout = config.get_int("runtime", "global_timeout_secs", 60);
    if timeout < 1 {
        return Err(invalid("runtime", "global_timeout_secs", "must be positive"));
    }

    let ttl = config.get_int("data", "cache_ttl_secs", 300);
    if ttl < 0 {
        return Err(invalid("data", "cache_ttl_secs", "must not be negative"));
    }
    Ok(())
}

/// Build the analysis config from a validated config port.
pub fn analysis_config_from(config: &dyn ConfigPort) -> AnalysisConfig {
    let defaults = AnalysisConfig::default();
    AnalysisConfig {
        doji_threshold: config.get_double("signals", "doji_threshold", defaults.doji_threshold),
        mfi_period: config.get_int("signals", "mfi_period", defaults.mfi_period as i64) as usize,
        mfi_oversold: config.get_double("signals", "mfi_oversold", defaults.mfi_oversold),
        mfi_overbought: config.get_double("signals", "mfi_overbought", defaults.mfi_overbought),
        macd_fast: config.get_int("signals", "macd_fast", defaults.macd_fast as i64) as usize,
        macd_slow: config.get_int("signals", "macd_slow", defaults.macd_slow as i64) as usize,
        macd_signal: config.get_int("signals", "macd_signal", defaults.macd_signal as i64) as usize,
    }
}

pub fn coordinator_config_from(config: &dyn ConfigPort) -> CoordinatorConfig {
    CoordinatorConfig {
        worker_pool_size: config.get_int("runtime", "worker_pool_size", 0).max(0) as usize,
        global_timeout: Duration::from_secs(
            config.get_int("runtime", "global_timeout_secs", 60).max(1) as u64,
        ),
    }
}

pub fn bar_request_from(config: &dyn ConfigPort) -> BarRequest {
    let defaults = BarRequest::default();
    BarRequest {
        period: config
            .get_string("data", "period")
            .unwrap_or(defaults.period),
        interval: config
            .get_string("data", "interval")
            .unwrap_or(defaults.interval),
    }
}
