//! CSV file market-data adapter.
//!
//! One file per symbol and interval: `<SYMBOL>_<interval>.csv` with a
//! header row and `timestamp,open,high,low,close,volume` columns.
//! Timestamps are `%Y-%m-%d %H:%M:%S`, or a bare date for daily bars.

use crate::domain::error::TrisignalError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::{BarRequest, MarketDataPort};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, interval))
    }
}

fn provider_err(symbol: &str, reason: impl Into<String>) -> TrisignalError {
    TrisignalError::Provider {
        symbol: symbol.to_string(),
        reason: reason.into(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

impl MarketDataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str, request: &BarRequest) -> Result<Vec<Bar>, TrisignalError> {
        let path = self.csv_path(symbol, &request.interval);
        let content = fs::read_to_string(&path)
            .map_err(|e| provider_err(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| provider_err(symbol, format!("CSV parse error: {}", e)))?;

            let field = |idx: usize, name: &str| {
                record
                    .get(idx)
                    .ok_or_else(|| provider_err(symbol, format!("row {}: missing {} column", row + 1, name)))
            };

            let timestamp = parse_timestamp(field(0, "timestamp")?).ok_or_else(|| {
                provider_err(symbol, format!("row {}: invalid timestamp", row + 1))
            })?;

            let mut numbers = [0.0_f64; 5];
            for (slot, (idx, name)) in numbers.iter_mut().zip([
                (1, "open"),
                (2, "high"),
                (3, "low"),
                (4, "close"),
                (5, "volume"),
            ]) {
                *slot = field(idx, name)?.trim().parse().map_err(|e| {
                    provider_err(symbol, format!("row {}: invalid {}: {}", row + 1, name, e))
                })?;
            }

            bars.push(Bar {
                symbol: symbol.to_string(),
                timestamp,
                open: numbers[0],
                high: numbers[1],
                low: numbers[2],
                close: numbers[3],
                volume: numbers[4],
            });
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TrisignalError> {
        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(stem) = name.strip_suffix(".csv") {
                if let Some((symbol, _interval)) = stem.rsplit_once('_') {
                    if !symbols.contains(&symbol.to_string()) {
                        symbols.push(symbol.to_string());
                    }
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) {
        let mut file = fs::File::create(dir.path().join(name)).unwrap();
        write!(file, "{}", content).unwrap();
    }

    const SAMPLE: &str = "\
timestamp,open,high,low,close,volume
2024-01-02 09:15:00,100.0,101.5,99.5,101.0,120000
2024-01-02 09:30:00,101.0,102.0,100.5,101.5,90000
";

    #[test]
    fn fetch_parses_intraday_rows() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "NIFTY_15m.csv", SAMPLE);

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let bars = adapter
            .fetch_bars("NIFTY", &BarRequest::default())
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].symbol, "NIFTY");
        assert!((bars[0].open - 100.0).abs() < f64::EPSILON);
        assert!((bars[1].volume - 90000.0).abs() < f64::EPSILON);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn fetch_parses_daily_dates() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "TCS_1d.csv",
            "timestamp,open,high,low,close,volume\n2024-01-02,100,101,99,100.5,5000\n",
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let request = BarRequest {
            period: "1mo".into(),
            interval: "1d".into(),
        };
        let bars = adapter.fetch_bars("TCS", &request).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(
            bars[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn missing_file_is_provider_failure() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter
            .fetch_bars("ABSENT", &BarRequest::default())
            .unwrap_err();
        assert!(matches!(err, TrisignalError::Provider { ref symbol, .. } if symbol == "ABSENT"));
    }

    #[test]
    fn malformed_number_is_provider_failure() {
        let dir = TempDir::new().unwrap();
        write_csv(
            &dir,
            "BAD_15m.csv",
            "timestamp,open,high,low,close,volume\n2024-01-02 09:15:00,abc,1,1,1,1\n",
        );

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter
            .fetch_bars("BAD", &BarRequest::default())
            .unwrap_err();
        assert!(matches!(err, TrisignalError::Provider { .. }));
    }

    #[test]
    fn list_symbols_scans_directory() {
        let dir = TempDir::new().unwrap();
        write_csv(&dir, "NIFTY_15m.csv", SAMPLE);
        write_csv(&dir, "TCS_15m.csv", SAMPLE);
        write_csv(&dir, "notes.txt", "ignored");

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        assert_eq!(adapter.list_symbols().unwrap(), vec!["NIFTY", "TCS"]);
    }
}
