//! ROC (Rate of Change) indicator implementation.
//!
//! ROC(n)[i] = (C[i] - C[i-n]) / C[i-n], as a fraction
//! If C[i-n] == 0: ROC = 0
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Bar;

pub fn calculate_roc(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if period == 0 || i < period {
            values.push(IndicatorPoint::invalid(bar.date));
            continue;
        }

        let prev_close = bars[i - period].close;
        let value = if prev_close == 0.0 {
            0.0
        } else {
            (bar.close - prev_close) / prev_close
        };
        values.push(IndicatorPoint::simple(bar.date, value));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period),
        values,
    }
}
