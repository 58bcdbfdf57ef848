//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! All EMAs are seeded with their first input, so there is no warmup.

use crate::domain::indicator::ema::ema_of;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[Bar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_of(&closes, fast);
    let ema_slow = ema_of(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_of(&macd_line, signal_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Macd {
                line: macd_line[i],
                signal: signal_line[i],
                histogram: macd_line[i] - signal_line[i],
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[Bar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::new("TEST", start + chrono::Duration::days(i as i64), close))
            .collect()
    }

    fn unpack(point: &IndicatorPoint) -> (f64, f64, f64) {
        match point.value {
            IndicatorValue::Macd {
                line,
                signal,
                histogram,
            } => (line, signal, histogram),
            _ => panic!("Expected Macd value"),
        }
    }

    #[test]
    fn macd_first_bar_is_zero() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let series = calculate_macd_default(&bars);
        let (line, signal, histogram) = unpack(&series.values[0]);
        assert_relative_eq!(line, 0.0);
        assert_relative_eq!(signal, 0.0);
        assert_relative_eq!(histogram, 0.0);
    }

    #[test]
    fn macd_constant_prices_stay_zero() {
        let bars = make_bars(&[100.0; 40]);
        let series = calculate_macd_default(&bars);
        for point in &series.values {
            let (line, signal, _) = unpack(point);
            assert_relative_eq!(line, 0.0);
            assert_relative_eq!(signal, 0.0);
        }
    }

    #[test]
    fn macd_rising_prices_positive_line() {
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let series = calculate_macd_default(&make_bars(&prices));
        let (line, signal, histogram) = unpack(&series.values[39]);
        assert!(line > 0.0);
        assert!(signal > 0.0);
        assert!(signal < line);
        assert_relative_eq!(histogram, line - signal);
    }

    #[test]
    fn macd_second_bar_matches_manual() {
        let bars = make_bars(&[10.0, 20.0]);
        let series = calculate_macd(&bars, 1, 3, 1);
        // fast k = 1 → 20; slow k = 0.5 → 15; line = 5; signal k = 1 → 5
        let (line, signal, histogram) = unpack(&series.values[1]);
        assert_relative_eq!(line, 5.0);
        assert_relative_eq!(signal, 5.0);
        assert_relative_eq!(histogram, 0.0);
    }

    #[test]
    fn macd_all_points_valid() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0]);
        let series = calculate_macd_default(&bars);
        assert_eq!(series.values.len(), 4);
        assert!(series.values.iter().all(|p| p.valid));
    }

    #[test]
    fn macd_degenerate_inputs() {
        assert!(calculate_macd_default(&[]).values.is_empty());
        assert!(calculate_macd(&make_bars(&[1.0]), 0, 26, 9).values.is_empty());
    }

    #[test]
    fn macd_indicator_type() {
        let series = calculate_macd_default(&make_bars(&[1.0]));
        assert_eq!(
            series.indicator_type,
            IndicatorType::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }
}
