//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close (no warmup bias correction),
//! then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Every bar is valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Bar;

pub fn calculate_ema(bars: &[Bar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = ema_of(&closes, period)
        .into_iter()
        .zip(bars)
        .map(|(ema, bar)| IndicatorPoint::simple(bar.date, ema))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

/// Seeded EMA over an arbitrary series. Also used for the MACD signal line.
pub(crate) fn ema_of(series: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    let Some(&first) = series.first() else {
        return out;
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = first;
    out.push(ema);

    for &value in &series[1..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(
                    "TEST",
                    NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                    close,
                )
            })
            .collect()
    }

    #[test]
    fn ema_seeded_with_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        assert!(series.values.iter().all(|p| p.valid));
        let values = series.simple_values();
        assert_relative_eq!(values[0].unwrap(), 10.0);
    }

    #[test]
    fn ema_recursive_step() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let values = calculate_ema(&bars, 3).simple_values();

        // k = 0.5
        assert_relative_eq!(values[1].unwrap(), 15.0);
        assert_relative_eq!(values[2].unwrap(), 22.5);
    }

    #[test]
    fn ema_constant_series() {
        let bars = make_bars(&[50.0; 10]);
        let values = calculate_ema(&bars, 4).simple_values();
        for v in values {
            assert_relative_eq!(v.unwrap(), 50.0);
        }
    }

    #[test]
    fn ema_empty_and_zero_period() {
        assert!(calculate_ema(&[], 12).values.is_empty());
        assert!(calculate_ema(&make_bars(&[1.0, 2.0]), 0).values.is_empty());
    }

    #[test]
    fn ema_of_empty_series() {
        assert!(ema_of(&[], 9).is_empty());
    }

    #[test]
    fn ema_indicator_type() {
        let series = calculate_ema(&make_bars(&[1.0]), 12);
        assert_eq!(series.indicator_type, IndicatorType::Ema(12));
    }
}
