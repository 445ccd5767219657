//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::cache_adapter::CacheAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    analysis_config_from, bar_request_from, coordinator_config_from, validate_config,
};
use crate::domain::coordinator::{analyze_universe, BatchResult};
use crate::domain::error::TrisignalError;
use crate::domain::signal::Direction;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "trisignal", about = "Multi-symbol trading signal analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze configured symbols and print their latest signals
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Comma-separated symbol list, overriding the config file
        #[arg(short, long)]
        symbols: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available in the configured data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze { config, symbols } => run_analyze(&config, symbols.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TrisignalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn build_data_port(adapter: &FileConfigAdapter, config_path: &PathBuf) -> Arc<dyn MarketDataPort> {
    let csv_dir = adapter
        .get_string("data", "csv_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            config_path
                .parent()
                .map(|p| p.join("data"))
                .unwrap_or_else(|| PathBuf::from("data"))
        });
    let ttl = adapter.get_int("data", "cache_ttl_secs", 300).max(0) as u64;
    Arc::new(CacheAdapter::new(
        CsvAdapter::new(csv_dir),
        Duration::from_secs(ttl),
    ))
}

fn configured_symbols(
    adapter: &FileConfigAdapter,
    override_list: Option<&str>,
) -> Result<Vec<String>, ExitCode> {
    let raw = match override_list {
        Some(list) => list.to_string(),
        None => adapter.get_string("runtime", "symbols").ok_or_else(|| {
            let err = TrisignalError::ConfigInvalid {
                section: "runtime".into(),
                key: "symbols".into(),
                reason: "no symbols configured and none given on the command line".into(),
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })?,
    };

    parse_symbols(&raw).map_err(|e| {
        let err = TrisignalError::ConfigInvalid {
            section: "runtime".into(),
            key: "symbols".into(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_analyze(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return ExitCode::from(&e);
    }

    let symbols = match configured_symbols(&adapter, symbol_override) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let analysis = analysis_config_from(&adapter);
    let coordinator = coordinator_config_from(&adapter);
    let request = bar_request_from(&adapter);
    let port = build_data_port(&adapter, config_path);

    eprintln!(
        "Analyzing {} symbol(s), period {} interval {}",
        symbols.len(),
        request.period,
        request.interval
    );
    let batch = analyze_universe(port, &symbols, &request, &analysis, &coordinator);
    print_batch(&batch);

    if batch.success_count() == 0 && !batch.reports.is_empty() {
        return ExitCode::from(3);
    }
    ExitCode::SUCCESS
}

fn print_batch(batch: &BatchResult) {
    println!(
        "{:<12} {:>6} {:>8} {:>6} {:>6}  {:<8} {}",
        "SYMBOL", "BARS", "SIGNALS", "BUY", "SELL", "LATEST", "CONTRIBUTORS"
    );
    for (symbol, analysis) in batch.successes() {
        let s = &analysis.summary;
        let (latest, contributors) = match &s.latest {
            Some(record) if record.direction != Direction::Hold => (
                format!("{}/{}", record.direction, record.strength),
                record.contributors.to_string(),
            ),
            _ => ("HOLD".to_string(), String::new()),
        };
        println!(
            "{:<12} {:>6} {:>8} {:>6} {:>6}  {:<8} {}",
            symbol, s.bar_count, s.total_signals, s.buy_signals, s.sell_signals, latest, contributors
        );
    }
    for (symbol, error) in batch.failures() {
        eprintln!("Warning: {} failed ({})", symbol, error);
    }
    println!(
        "{} analyzed, {} failed",
        batch.success_count(),
        batch.failure_count()
    );
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    match validate_config(&adapter) {
        Ok(()) => {
            println!("{} is valid", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let port = build_data_port(&adapter, config_path);
    match port.list_symbols() {
        Ok(symbols) => {
            for symbol in symbols {
                println!("{symbol}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}
