//! Per-bar indicator frame.
//!
//! The frame is built once from the pure column calculations in
//! [`crate::domain::indicator`] and never mutated afterwards. Each row carries
//! the bar itself plus every derived field as an `Option<f64>`, `None` meaning
//! the field is still inside its warmup window.
//!
//! Load-bearing fields for the entry rule are `rsi`, `dma_fast` and
//! `dma_slow`; [`IndicatorFrame::usable_rows`] drops rows where any of them is
//! undefined. The remaining fields are informational.

use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{
    calculate_macd, calculate_roc, calculate_rsi, calculate_sma, calculate_stddev, IndicatorValue,
};
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub dma_fast: usize,
    pub dma_slow: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volatility_window: usize,
    pub roc_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_period: 14,
            dma_fast: 20,
            dma_slow: 50,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
            volatility_window: 10,
            roc_period: 5,
        }
    }
}

impl IndicatorParams {
    /// Index of the first row where every load-bearing field is defined.
    pub fn first_usable_index(&self) -> usize {
        self.rsi_period
            .max(self.dma_fast.saturating_sub(1))
            .max(self.dma_slow.saturating_sub(1))
    }

    /// Fewest bars that leave at least two usable rows for the simulator.
    pub fn min_bars(&self) -> usize {
        self.first_usable_index() + 2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: Option<u64>,
    pub rsi: Option<f64>,
    pub dma_fast: Option<f64>,
    pub dma_slow: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub volatility: Option<f64>,
    pub roc: Option<f64>,
}

impl IndicatorRow {
    pub fn is_usable(&self) -> bool {
        self.rsi.is_some() && self.dma_fast.is_some() && self.dma_slow.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub symbol: String,
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn compute(symbol: &str, bars: &[Bar], params: &IndicatorParams) -> Self {
        let rsi = calculate_rsi(bars, params.rsi_period).simple_values();
        let dma_fast = calculate_sma(bars, params.dma_fast).simple_values();
        let dma_slow = calculate_sma(bars, params.dma_slow).simple_values();
        let volatility = calculate_stddev(bars, params.volatility_window).simple_values();
        let roc = calculate_roc(bars, params.roc_period).simple_values();
        let macd = calculate_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let (macd_line, macd_signal) = match macd.values.get(i) {
                    Some(point) if point.valid => match point.value {
                        IndicatorValue::Macd { line, signal, .. } => (Some(line), Some(signal)),
                        IndicatorValue::Simple(_) => (None, None),
                    },
                    _ => (None, None),
                };

                IndicatorRow {
                    date: bar.date,
                    close: bar.close,
                    volume: bar.volume,
                    rsi: rsi[i],
                    dma_fast: dma_fast[i],
                    dma_slow: dma_slow[i],
                    macd: macd_line,
                    macd_signal,
                    volatility: volatility[i],
                    roc: roc[i],
                }
            })
            .collect();

        Self {
            symbol: symbol.to_string(),
            rows,
        }
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with every load-bearing field defined, in date order.
    pub fn usable_rows(&self) -> Vec<IndicatorRow> {
        self.rows.iter().filter(|r| r.is_usable()).cloned().collect()
    }
}
