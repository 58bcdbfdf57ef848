//! Entry signal generation.
//!
//! A row signals an entry when RSI is below the threshold while the fast
//! moving average is above the slow one. Rows are evaluated independently.
//! Any undefined or NaN operand evaluates to `false`.

use crate::domain::frame::IndicatorRow;

pub const DEFAULT_RSI_ENTRY_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EntryRule {
    pub rsi_threshold: f64,
}

impl Default for EntryRule {
    fn default() -> Self {
        EntryRule {
            rsi_threshold: DEFAULT_RSI_ENTRY_THRESHOLD,
        }
    }
}

impl EntryRule {
    pub fn evaluate(&self, row: &IndicatorRow) -> bool {
        match (row.rsi, row.dma_fast, row.dma_slow) {
            // NaN makes both comparisons false
            (Some(rsi), Some(fast), Some(slow)) => rsi < self.rsi_threshold && fast > slow,
            _ => false,
        }
    }
}

/// One flag per row, same length as `rows`.
pub fn generate_signals(rows: &[IndicatorRow], rule: &EntryRule) -> Vec<bool> {
    rows.iter().map(|row| rule.evaluate(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(rsi: Option<f64>, fast: Option<f64>, slow: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            close: 100.0,
            volume: None,
            rsi,
            dma_fast: fast,
            dma_slow: slow,
            macd: None,
            macd_signal: None,
            volatility: None,
            roc: None,
        }
    }

    #[test]
    fn entry_when_oversold_in_uptrend() {
        let rule = EntryRule::default();
        assert!(rule.evaluate(&row(Some(25.0), Some(105.0), Some(100.0))));
    }

    #[test]
    fn no_entry_when_rsi_at_threshold() {
        let rule = EntryRule::default();
        assert!(!rule.evaluate(&row(Some(30.0), Some(105.0), Some(100.0))));
    }

    #[test]
    fn no_entry_when_averages_equal_or_inverted() {
        let rule = EntryRule::default();
        assert!(!rule.evaluate(&row(Some(20.0), Some(100.0), Some(100.0))));
        assert!(!rule.evaluate(&row(Some(20.0), Some(95.0), Some(100.0))));
    }

    #[test]
    fn undefined_fields_never_signal() {
        let rule = EntryRule::default();
        assert!(!rule.evaluate(&row(None, Some(105.0), Some(100.0))));
        assert!(!rule.evaluate(&row(Some(10.0), None, Some(100.0))));
        assert!(!rule.evaluate(&row(Some(10.0), Some(105.0), None)));
    }

    #[test]
    fn nan_fields_never_signal() {
        let rule = EntryRule::default();
        assert!(!rule.evaluate(&row(Some(f64::NAN), Some(105.0), Some(100.0))));
        assert!(!rule.evaluate(&row(Some(10.0), Some(f64::NAN), Some(100.0))));
        assert!(!rule.evaluate(&row(Some(10.0), Some(105.0), Some(f64::NAN))));
    }

    #[test]
    fn custom_threshold() {
        let rule = EntryRule { rsi_threshold: 40.0 };
        assert!(rule.evaluate(&row(Some(35.0), Some(105.0), Some(100.0))));
    }

    #[test]
    fn signals_match_row_count() {
        let rows = vec![
            row(Some(25.0), Some(105.0), Some(100.0)),
            row(Some(50.0), Some(105.0), Some(100.0)),
            row(Some(25.0), Some(95.0), Some(100.0)),
        ];
        let signals = generate_signals(&rows, &EntryRule::default());
        assert_eq!(signals, vec![true, false, false]);
    }
}
