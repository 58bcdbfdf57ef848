#![allow(dead_code)]

use chrono::NaiveDate;
use sigtrader::domain::backtest::BacktestConfig;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::Bar;
use sigtrader::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
    pub requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SigtraderError> {
        self.requests
            .lock()
            .unwrap()
            .push((symbol.to_string(), start_date, end_date));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SigtraderError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> Bar {
    Bar::new(
        symbol,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        close,
    )
    .with_volume(1000)
}

/// Consecutive calendar days starting at `start_date`, one bar per close.
pub fn bars_from_closes(symbol: &str, start_date: &str, closes: &[f64]) -> Vec<Bar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar::new(symbol, start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn generate_bars(symbol: &str, start_date: &str, count: usize, start_price: f64) -> Vec<Bar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(symbol, start_date, &closes)
}

/// 50 bars rising by 10 a day to a peak of 590, then 25 bars falling by 0.5.
///
/// With default parameters the first usable row is the peak (bar 49). RSI
/// drops to 0 once fourteen consecutive declines fill its window (bar 63)
/// while the 20-day average stays above the 50-day, giving two trades:
/// bars 63 -> 68 (hold expiry, P&L -2.5) and 69 -> 73 (forced exit, P&L -2).
pub fn trend_then_pullback(symbol: &str, start_date: &str) -> Vec<Bar> {
    let mut closes: Vec<f64> = (0..50).map(|i| 100.0 + 10.0 * i as f64).collect();
    closes.extend((1..=25).map(|j| 590.0 - 0.5 * j as f64));
    bars_from_closes(symbol, start_date, &closes)
}

pub fn sample_config(instruments: &[&str]) -> BacktestConfig {
    BacktestConfig::new(
        instruments.iter().map(|s| s.to_string()).collect(),
        date(2024, 6, 30),
    )
}
