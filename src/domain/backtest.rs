//! Backtest pipeline: bars → indicator frame → signals → trades → summary.
//!
//! Each instrument runs independently; [`run_batch`] fans instruments out
//! across a rayon pool and collects one `Result` per instrument, so a bad
//! instrument never aborts its neighbours.

use crate::domain::error::SigtraderError;
use crate::domain::frame::{IndicatorFrame, IndicatorParams};
use crate::domain::metrics::{InstrumentSummary, Summary};
use crate::domain::ohlcv::{validate_bars, Bar};
use crate::domain::position::TradeLog;
use crate::domain::signal::{generate_signals, EntryRule};
use crate::domain::simulator::{simulate_trades, SimulatorConfig};
use crate::ports::data_port::DataPort;
use chrono::{Days, NaiveDate};
use log::{info, warn};
use rayon::prelude::*;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 180;
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub instruments: Vec<String>,
    pub end_date: NaiveDate,
    pub lookback_days: i64,
    pub indicators: IndicatorParams,
    pub entry: EntryRule,
    pub simulator: SimulatorConfig,
}

impl BacktestConfig {
    pub fn new(instruments: Vec<String>, end_date: NaiveDate) -> Self {
        BacktestConfig {
            instruments,
            end_date,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            indicators: IndicatorParams::default(),
            entry: EntryRule::default(),
            simulator: SimulatorConfig::default(),
        }
    }

    /// First calendar day of the lookback window. Saturates at
    /// `NaiveDate::MIN` instead of overflowing.
    pub fn start_date(&self) -> NaiveDate {
        let days = Days::new(self.lookback_days.max(0) as u64);
        self.end_date
            .checked_sub_days(days)
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Runs the core pipeline over one instrument's bars.
///
/// Empty or too-short input is reported as `NoData` / `InsufficientData`;
/// malformed input as `MalformedBar`.
pub fn run_instrument(
    symbol: &str,
    bars: &[Bar],
    config: &BacktestConfig,
) -> Result<TradeLog, SigtraderError> {
    if bars.is_empty() {
        return Err(SigtraderError::NoData {
            symbol: symbol.to_string(),
        });
    }
    validate_bars(symbol, bars)?;

    let minimum = config.indicators.min_bars();
    if bars.len() < minimum {
        return Err(SigtraderError::InsufficientData {
            symbol: symbol.to_string(),
            bars: bars.len(),
            minimum,
        });
    }

    let frame = IndicatorFrame::compute(symbol, bars, &config.indicators);
    let rows = frame.usable_rows();
    let signals = generate_signals(&rows, &config.entry);
    info!(
        "{symbol}: {} usable rows of {}, {} entry signals",
        rows.len(),
        frame.len(),
        signals.iter().filter(|&&s| s).count()
    );

    Ok(simulate_trades(symbol, &rows, &signals, &config.simulator))
}

#[derive(Debug)]
pub struct InstrumentReport {
    pub symbol: String,
    pub outcome: Result<TradeLog, SigtraderError>,
}

impl InstrumentReport {
    pub fn trade_log(&self) -> Option<&TradeLog> {
        self.outcome.as_ref().ok()
    }

    /// No data or too little data: counts as an empty trade log.
    pub fn is_skipped(&self) -> bool {
        matches!(&self.outcome, Err(e) if e.is_skip())
    }

    /// Rejected outright (malformed bars, data source failure).
    pub fn is_rejected(&self) -> bool {
        matches!(&self.outcome, Err(e) if !e.is_skip())
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub instruments: Vec<InstrumentReport>,
}

impl BatchReport {
    pub fn trade_logs(&self) -> impl Iterator<Item = &TradeLog> {
        self.instruments.iter().filter_map(InstrumentReport::trade_log)
    }

    pub fn summary(&self) -> Summary {
        Summary::from_logs(self.trade_logs())
    }

    pub fn per_instrument(&self) -> Vec<InstrumentSummary> {
        let logs: Vec<TradeLog> = self.trade_logs().cloned().collect();
        InstrumentSummary::compute_per_instrument(&logs)
    }

    pub fn has_results(&self) -> bool {
        self.instruments.iter().any(|i| i.outcome.is_ok())
    }
}

/// Fetches and backtests every configured instrument.
pub fn run_batch(data_port: &dyn DataPort, config: &BacktestConfig) -> BatchReport {
    let start_date = config.start_date();
    info!(
        "Running {} instruments from {} to {} via {}",
        config.instruments.len(),
        start_date,
        config.end_date,
        data_port.name()
    );

    let instruments = config
        .instruments
        .par_iter()
        .map(|symbol| {
            info!("{symbol}: fetching data from {start_date} to {}", config.end_date);
            let outcome = data_port
                .fetch_bars(symbol, start_date, config.end_date)
                .and_then(|bars| run_instrument(symbol, &bars, config));

            match &outcome {
                Ok(log) => info!("{symbol}: {} trades", log.len()),
                Err(e) if e.is_skip() => warn!("{symbol}: skipping ({e})"),
                Err(e) => warn!("{symbol}: rejected ({e})"),
            }

            InstrumentReport {
                symbol: symbol.clone(),
                outcome,
            }
        })
        .collect();

    BatchReport { instruments }
}
