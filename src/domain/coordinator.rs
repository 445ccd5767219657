//! Parallel evaluation coordinator.
//!
//! Runs the per-symbol pipeline once per symbol across a bounded worker
//! pool. Each worker pulls jobs from a shared channel, fetches that
//! symbol's bars through the data port and publishes exactly one result
//! into its pre-assigned slot. The join applies a single global deadline;
//! symbols still outstanding when it passes are recorded as timeouts and
//! their workers are abandoned.

use crate::domain::analysis::{analyze_symbol, AnalysisConfig, SymbolAnalysis};
use crate::domain::error::TrisignalError;
use crate::ports::data_port::{BarRequest, MarketDataPort};
use crossbeam_channel::{unbounded, RecvTimeoutError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_WORKER_CEILING: usize = 10;
pub const DEFAULT_GLOBAL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Worker pool size; 0 means min(symbol count, the practical ceiling).
    pub worker_pool_size: usize,
    pub global_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: 0,
            global_timeout: DEFAULT_GLOBAL_TIMEOUT,
        }
    }
}

/// One symbol's slot in the merged batch: a complete analysis or an
/// explicit failure reason, never a silently empty result.
#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: Result<SymbolAnalysis, TrisignalError>,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    pub reports: Vec<SymbolReport>,
}

impl BatchResult {
    pub fn successes(&self) -> impl Iterator<Item = (&str, &SymbolAnalysis)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok().map(|a| (r.symbol.as_str(), a)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &TrisignalError)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.symbol.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

fn run_one(
    port: &dyn MarketDataPort,
    symbol: &str,
    request: &BarRequest,
    config: &AnalysisConfig,
) -> Result<SymbolAnalysis, TrisignalError> {
    let bars = port.fetch_bars(symbol, request)?;
    analyze_symbol(symbol, bars, config)
}

/// Analyze a batch of symbols in parallel and merge the outcomes.
///
/// Per-symbol failures (provider errors, bad bar data, worker panics) are
/// isolated to their own slot; sibling symbols always run to completion or
/// their own failure.
pub fn analyze_universe(
    port: Arc<dyn MarketDataPort>,
    symbols: &[String],
    request: &BarRequest,
    config: &AnalysisConfig,
    coordinator: &CoordinatorConfig,
) -> BatchResult {
    if symbols.is_empty() {
        return BatchResult::default();
    }

    let pool_size = if coordinator.worker_pool_size == 0 {
        symbols.len().min(DEFAULT_WORKER_CEILING)
    } else {
        coordinator.worker_pool_size.min(symbols.len())
    };

    let (job_tx, job_rx) = unbounded::<(usize, String)>();
    let (result_tx, result_rx) =
        unbounded::<(usize, Result<SymbolAnalysis, TrisignalError>)>();

    for (idx, symbol) in symbols.iter().enumerate() {
        // Receiver outlives this loop; an unbounded send cannot fail here.
        let _ = job_tx.send((idx, symbol.clone()));
    }
    drop(job_tx);

    for _ in 0..pool_size {
        let jobs = job_rx.clone();
        let results = result_tx.clone();
        let port = Arc::clone(&port);
        let request = request.clone();
        let config = config.clone();

        thread::spawn(move || {
            while let Ok((idx, symbol)) = jobs.recv() {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    run_one(port.as_ref(), &symbol, &request, &config)
                }))
                .unwrap_or_else(|panic| {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    Err(TrisignalError::WorkerPanic {
                        symbol: symbol.clone(),
                        reason,
                    })
                });
                // The coordinator may have given up on the deadline; a
                // failed send just means the result is discarded.
                if results.send((idx, outcome)).is_err() {
                    break;
                }
            }
        });
    }
    drop(result_tx);

    // One write-once slot per symbol; this thread is the only writer.
    let mut slots: Vec<Option<Result<SymbolAnalysis, TrisignalError>>> =
        (0..symbols.len()).map(|_| None).collect();
    let deadline = Instant::now() + coordinator.global_timeout;
    let mut remaining = symbols.len();

    while remaining > 0 {
        match result_rx.recv_deadline(deadline) {
            Ok((idx, outcome)) => {
                if slots[idx].is_none() {
                    slots[idx] = Some(outcome);
                    remaining -= 1;
                }
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    let reports = symbols
        .iter()
        .zip(slots)
        .map(|(symbol, slot)| SymbolReport {
            symbol: symbol.clone(),
            outcome: slot.unwrap_or_else(|| {
                Err(TrisignalError::Timeout {
                    symbol: symbol.clone(),
                })
            }),
        })
        .collect();

    BatchResult { reports }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct MapPort {
        data: HashMap<String, Vec<Bar>>,
        errors: HashMap<String, String>,
        delay: Option<(String, Duration)>,
    }

    impl MapPort {
        fn new() -> Self {
            Self {
                data: HashMap::new(),
                errors: HashMap::new(),
                delay: None,
            }
        }

        fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
            self.data.insert(symbol.to_string(), bars);
            self
        }

        fn with_error(mut self, symbol: &str, reason: &str) -> Self {
            self.errors.insert(symbol.to_string(), reason.to_string());
            self
        }

        fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
            self.delay = Some((symbol.to_string(), delay));
            self
        }
    }

    impl MarketDataPort for MapPort {
        fn fetch_bars(
            &self,
            symbol: &str,
            _request: &BarRequest,
        ) -> Result<Vec<Bar>, TrisignalError> {
            if let Some((slow_symbol, delay)) = &self.delay {
                if slow_symbol == symbol {
                    thread::sleep(*delay);
                }
            }
            if let Some(reason) = self.errors.get(symbol) {
                return Err(TrisignalError::Provider {
                    symbol: symbol.to_string(),
                    reason: reason.clone(),
                });
            }
            Ok(self.data.get(symbol).cloned().unwrap_or_default())
        }

        fn list_symbols(&self) -> Result<Vec<String>, TrisignalError> {
            Ok(self.data.keys().cloned().collect())
        }
    }

    fn wave_bars(symbol: &str, n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.45).sin() * 8.0;
                Bar {
                    symbol: symbol.to_string(),
                    timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                        .unwrap()
                        .and_hms_opt(9, 0, 0)
                        .unwrap()
                        + chrono::Duration::minutes(15 * i as i64),
                    open: close - 0.2,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1500.0,
                }
            })
            .collect()
    }

    fn syms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_symbol_list_returns_empty_batch() {
        let port = Arc::new(MapPort::new());
        let batch = analyze_universe(
            port,
            &[],
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );
        assert!(batch.reports.is_empty());
    }

    #[test]
    fn all_symbols_get_a_slot_in_input_order() {
        let port = Arc::new(
            MapPort::new()
                .with_bars("AAA", wave_bars("AAA", 60))
                .with_bars("BBB", wave_bars("BBB", 60))
                .with_bars("CCC", wave_bars("CCC", 60)),
        );
        let symbols = syms(&["AAA", "BBB", "CCC"]);
        let batch = analyze_universe(
            port,
            &symbols,
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );

        assert_eq!(batch.reports.len(), 3);
        for (report, expected) in batch.reports.iter().zip(&symbols) {
            assert_eq!(&report.symbol, expected);
            assert!(report.outcome.is_ok());
        }
    }

    #[test]
    fn provider_failure_is_isolated_to_its_symbol() {
        let port = Arc::new(
            MapPort::new()
                .with_bars("GOOD", wave_bars("GOOD", 60))
                .with_error("BAD", "connection refused"),
        );
        let symbols = syms(&["GOOD", "BAD"]);
        let batch = analyze_universe(
            port,
            &symbols,
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );

        assert_eq!(batch.success_count(), 1);
        assert_eq!(batch.failure_count(), 1);
        assert!(batch.reports[0].outcome.is_ok());
        assert!(matches!(
            batch.reports[1].outcome,
            Err(TrisignalError::Provider { .. })
        ));
    }

    #[test]
    fn failing_sibling_does_not_change_other_results() {
        let bars = wave_bars("GOOD", 80);
        let alone = analyze_universe(
            Arc::new(MapPort::new().with_bars("GOOD", bars.clone())),
            &syms(&["GOOD"]),
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );
        let with_sibling = analyze_universe(
            Arc::new(
                MapPort::new()
                    .with_bars("GOOD", bars)
                    .with_error("BAD", "boom"),
            ),
            &syms(&["GOOD", "BAD"]),
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );

        let a = alone.reports[0].outcome.as_ref().unwrap();
        let b = with_sibling.reports[0].outcome.as_ref().unwrap();
        assert_eq!(a.signals, b.signals);
    }

    #[test]
    fn invalid_bar_data_reports_invalid_sequence() {
        let mut bars = wave_bars("DUP", 10);
        bars[5].timestamp = bars[4].timestamp;
        let port = Arc::new(MapPort::new().with_bars("DUP", bars));
        let batch = analyze_universe(
            port,
            &syms(&["DUP"]),
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );

        assert!(matches!(
            batch.reports[0].outcome,
            Err(TrisignalError::InvalidBarSequence { .. })
        ));
    }

    #[test]
    fn empty_series_is_a_success_with_no_signals() {
        let port = Arc::new(MapPort::new().with_bars("EMPTY", vec![]));
        let batch = analyze_universe(
            port,
            &syms(&["EMPTY"]),
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig::default(),
        );

        let analysis = batch.reports[0].outcome.as_ref().unwrap();
        assert!(analysis.ha_bars.is_empty());
        assert!(analysis.signals.is_empty());
    }

    #[test]
    fn slow_symbol_times_out_without_blocking_others() {
        let port = Arc::new(
            MapPort::new()
                .with_bars("FAST", wave_bars("FAST", 60))
                .with_bars("SLOW", wave_bars("SLOW", 60))
                .with_delay("SLOW", Duration::from_secs(5)),
        );
        let batch = analyze_universe(
            port,
            &syms(&["FAST", "SLOW"]),
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig {
                worker_pool_size: 2,
                global_timeout: Duration::from_millis(250),
            },
        );

        assert!(batch.reports[0].outcome.is_ok());
        assert!(matches!(
            batch.reports[1].outcome,
            Err(TrisignalError::Timeout { .. })
        ));
    }

    #[test]
    fn single_worker_still_processes_every_symbol() {
        let port = Arc::new(
            MapPort::new()
                .with_bars("AAA", wave_bars("AAA", 40))
                .with_bars("BBB", wave_bars("BBB", 40))
                .with_bars("CCC", wave_bars("CCC", 40))
                .with_bars("DDD", wave_bars("DDD", 40)),
        );
        let batch = analyze_universe(
            port,
            &syms(&["AAA", "BBB", "CCC", "DDD"]),
            &BarRequest::default(),
            &AnalysisConfig::default(),
            &CoordinatorConfig {
                worker_pool_size: 1,
                global_timeout: Duration::from_secs(30),
            },
        );

        assert_eq!(batch.success_count(), 4);
    }

    #[test]
    fn parallel_results_match_sequential_results() {
        let symbols = syms(&["AAA", "BBB", "CCC", "DDD", "EEE"]);
        let mut port = MapPort::new();
        for (i, s) in symbols.iter().enumerate() {
            port = port.with_bars(s, wave_bars(s, 60 + i * 10));
        }
        let port = Arc::new(port);
        let config = AnalysisConfig::default();

        let batch = analyze_universe(
            Arc::clone(&port) as Arc<dyn MarketDataPort>,
            &symbols,
            &BarRequest::default(),
            &config,
            &CoordinatorConfig::default(),
        );

        for report in &batch.reports {
            let bars = port
                .fetch_bars(&report.symbol, &BarRequest::default())
                .unwrap();
            let sequential = analyze_symbol(&report.symbol, bars, &config).unwrap();
            let parallel = report.outcome.as_ref().unwrap();
            assert_eq!(parallel.signals, sequential.signals);
        }
    }
}
