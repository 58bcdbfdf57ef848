//! CSV result sink.
//!
//! Layout under the results directory:
//! - `{SYMBOL}_trades.csv` per instrument
//! - `all_trades.csv` combined ledger with ticker, holding days and upload time
//! - `summary.csv` aggregate metrics

use crate::domain::backtest::BatchReport;
use crate::domain::error::SigtraderError;
use crate::domain::metrics::Summary;
use crate::domain::position::{Trade, TradeLog};
use crate::ports::report_port::{ResultSink, TRADE_LOG_HEADERS};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const TRADES_SUFFIX: &str = "_trades.csv";
pub const LEDGER_FILE: &str = "all_trades.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

const LEDGER_HEADERS: [&str; 8] = [
    "Ticker",
    "Buy Date",
    "Buy Price",
    "Sell Date",
    "Sell Price",
    "P&L",
    "Holding Days",
    "Upload Time",
];

pub struct CsvResultAdapter {
    results_dir: PathBuf,
}

fn csv_err(e: csv::Error) -> SigtraderError {
    SigtraderError::Io(std::io::Error::other(e))
}

impl CsvResultAdapter {
    pub fn new(results_dir: PathBuf) -> Self {
        Self { results_dir }
    }

    pub fn trade_log_path(&self, symbol: &str) -> PathBuf {
        self.results_dir.join(format!("{}{}", symbol, TRADES_SUFFIX))
    }

    fn write_ledger(
        &self,
        report: &BatchReport,
        written_at: NaiveDateTime,
    ) -> Result<(), SigtraderError> {
        let path = self.results_dir.join(LEDGER_FILE);
        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;
        wtr.write_record(LEDGER_HEADERS).map_err(csv_err)?;

        let upload_time = written_at.format("%Y-%m-%d %H:%M:%S").to_string();
        for log in report.trade_logs() {
            for trade in &log.trades {
                wtr.write_record([
                    log.symbol.clone(),
                    trade.buy_date.to_string(),
                    trade.buy_price.to_string(),
                    trade.sell_date.to_string(),
                    trade.sell_price.to_string(),
                    trade.pnl.to_string(),
                    trade.holding_days().to_string(),
                    upload_time.clone(),
                ])
                .map_err(csv_err)?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_summary(&self, summary: &Summary) -> Result<(), SigtraderError> {
        let path = self.results_dir.join(SUMMARY_FILE);
        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;
        let s = summary.rounded();
        wtr.write_record(["Metric", "Value"]).map_err(csv_err)?;
        for (metric, value) in [
            ("Total Trades", s.total_trades.to_string()),
            ("Winning Trades", s.winning_trades.to_string()),
            ("Win Ratio (%)", format!("{:.2}", s.win_ratio)),
            ("Total P&L", format!("{:.2}", s.total_pnl)),
        ] {
            wtr.write_record([metric, value.as_str()]).map_err(csv_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ResultSink for CsvResultAdapter {
    fn write_trade_log(&self, log: &TradeLog) -> Result<(), SigtraderError> {
        fs::create_dir_all(&self.results_dir)?;
        let path = self.trade_log_path(&log.symbol);
        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;
        wtr.write_record(TRADE_LOG_HEADERS).map_err(csv_err)?;
        for trade in &log.trades {
            wtr.write_record([
                trade.buy_date.to_string(),
                trade.buy_price.to_string(),
                trade.sell_date.to_string(),
                trade.sell_price.to_string(),
                trade.pnl.to_string(),
            ])
            .map_err(csv_err)?;
        }
        wtr.flush()?;
        info!("{}: results saved to {}", log.symbol, path.display());
        Ok(())
    }

    fn write_batch(
        &self,
        report: &BatchReport,
        written_at: NaiveDateTime,
    ) -> Result<(), SigtraderError> {
        fs::create_dir_all(&self.results_dir)?;
        for instrument in &report.instruments {
            match &instrument.outcome {
                Ok(log) => self.write_trade_log(log)?,
                Err(e) if e.is_skip() => {
                    self.write_trade_log(&TradeLog::empty(&instrument.symbol))?
                }
                Err(e) => warn!("{}: rejected, no trade log written: {}", instrument.symbol, e),
            }
        }
        self.write_ledger(report, written_at)?;
        self.write_summary(&report.summary())?;
        info!("ledger and summary written to {}", self.results_dir.display());
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    path: &Path,
) -> Result<T, SigtraderError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse().map_err(|_| SigtraderError::DataSource {
        reason: format!(
            "invalid {} value '{}' in {}",
            TRADE_LOG_HEADERS[index],
            raw,
            path.display()
        ),
    })
}

fn read_trade_log(symbol: &str, path: &Path) -> Result<TradeLog, SigtraderError> {
    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;
    let mut log = TradeLog::empty(symbol);
    for result in rdr.records() {
        let record = result.map_err(|e| SigtraderError::DataSource {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;
        let buy_date: NaiveDate = parse_field(&record, 0, path)?;
        let buy_price: f64 = parse_field(&record, 1, path)?;
        let sell_date: NaiveDate = parse_field(&record, 2, path)?;
        let sell_price: f64 = parse_field(&record, 3, path)?;
        let pnl: f64 = parse_field(&record, 4, path)?;
        log.trades.push(Trade {
            buy_date,
            buy_price,
            sell_date,
            sell_price,
            pnl,
        });
    }
    Ok(log)
}

/// Loads every per-instrument trade log in `dir`, ordered by symbol.
///
/// A file that cannot be parsed is logged and skipped; only failing to list
/// the directory is an error.
pub fn read_trade_logs(dir: &Path) -> Result<Vec<TradeLog>, SigtraderError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == LEDGER_FILE {
            continue;
        }
        if let Some(symbol) = name.strip_suffix(TRADES_SUFFIX) {
            files.push((symbol.to_string(), entry.path()));
        }
    }
    files.sort();

    let mut logs = Vec::with_capacity(files.len());
    for (symbol, path) in &files {
        match read_trade_log(symbol, path) {
            Ok(log) => logs.push(log),
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }
    Ok(logs)
}
