//! CSV file data adapter.
//!
//! Reads `{dir}/{SYMBOL}.csv` with a header row naming at least `date` and
//! `close` (case-insensitive, so yfinance exports load as-is). A `volume`
//! column is optional. Rows keep file order; ordering is checked downstream.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use log::debug;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    volume: Option<usize>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<Columns, SigtraderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let date = find("date").ok_or_else(|| SigtraderError::DataSource {
            reason: "missing date column".into(),
        })?;
        let close = find("close").ok_or_else(|| SigtraderError::DataSource {
            reason: "missing close column".into(),
        })?;
        Ok(Columns {
            date,
            close,
            volume: find("volume"),
        })
    }
}

/// Accepts `YYYY-MM-DD` optionally followed by a time component.
fn parse_date(value: &str) -> Result<NaiveDate, SigtraderError> {
    let trimmed = value.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| SigtraderError::DataSource {
        reason: format!("invalid date '{}': {}", trimmed, e),
    })
}

impl DataPort for CsvAdapter {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SigtraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SigtraderError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SigtraderError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let columns = Self::locate_columns(headers)?;
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SigtraderError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date = parse_date(record.get(columns.date).unwrap_or(""))?;
            if date < start_date || date > end_date {
                continue;
            }

            let close_str = record.get(columns.close).unwrap_or("").trim();
            if close_str.is_empty() {
                debug!("{symbol}: dropping {date}, no close");
                continue;
            }
            let close: f64 = close_str.parse().map_err(|e| SigtraderError::DataSource {
                reason: format!("invalid close value '{}': {}", close_str, e),
            })?;

            let mut bar = Bar::new(symbol, date, close);
            if let Some(volume) = columns
                .volume
                .and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
            {
                bar = bar.with_volume(volume as u64);
            }
            bars.push(bar);
        }

        debug!("{symbol}: read {} bars from {}", bars.len(), path.display());
        Ok(bars)
    }
}
