//! Daily price bar representation and sequence validation.

use crate::domain::error::SigtraderError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Bar {
    pub fn new(symbol: &str, date: NaiveDate, close: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            date,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// Checks that a bar sequence is strictly increasing by date and every close
/// is a positive finite number.
///
/// Out-of-order input is rejected, never re-sorted.
pub fn validate_bars(symbol: &str, bars: &[Bar]) -> Result<(), SigtraderError> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(SigtraderError::MalformedBar {
                symbol: symbol.to_string(),
                date: bar.date,
                reason: format!("non-positive close {}", bar.close),
            });
        }

        if i > 0 {
            let prev = bars[i - 1].date;
            if bar.date == prev {
                return Err(SigtraderError::MalformedBar {
                    symbol: symbol.to_string(),
                    date: bar.date,
                    reason: "duplicate date".into(),
                });
            }
            if bar.date < prev {
                return Err(SigtraderError::MalformedBar {
                    symbol: symbol.to_string(),
                    date: bar.date,
                    reason: format!("date precedes previous bar {}", prev),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar::new("INFY.NS", NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), close)
    }

    #[test]
    fn valid_sequence_passes() {
        let bars = vec![bar(1, 100.0), bar(2, 101.0), bar(5, 99.5)];
        assert!(validate_bars("INFY.NS", &bars).is_ok());
    }

    #[test]
    fn empty_sequence_passes() {
        assert!(validate_bars("INFY.NS", &[]).is_ok());
    }

    #[test]
    fn duplicate_date_rejected() {
        let bars = vec![bar(1, 100.0), bar(2, 101.0), bar(2, 102.0)];
        let err = validate_bars("INFY.NS", &bars).unwrap_err();
        assert!(matches!(
            err,
            SigtraderError::MalformedBar { ref reason, .. } if reason == "duplicate date"
        ));
    }

    #[test]
    fn out_of_order_rejected() {
        let bars = vec![bar(1, 100.0), bar(3, 101.0), bar(2, 102.0)];
        let err = validate_bars("INFY.NS", &bars).unwrap_err();
        match err {
            SigtraderError::MalformedBar { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_positive_close_rejected() {
        let bars = vec![bar(1, 100.0), bar(2, 0.0)];
        assert!(validate_bars("INFY.NS", &bars).is_err());

        let bars = vec![bar(1, -3.0)];
        assert!(validate_bars("INFY.NS", &bars).is_err());
    }

    #[test]
    fn nan_close_rejected() {
        let bars = vec![bar(1, f64::NAN)];
        assert!(validate_bars("INFY.NS", &bars).is_err());
    }

    #[test]
    fn with_volume_sets_volume() {
        let b = bar(1, 100.0).with_volume(5_000);
        assert_eq!(b.volume, Some(5_000));
    }
}
