//! Performance summary over completed trades.

use crate::domain::position::{Trade, TradeLog};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_trades: usize,
    pub winning_trades: usize,
    /// Percentage of winning trades, 0 when there are none.
    pub win_ratio: f64,
    pub total_pnl: f64,
}

impl Summary {
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let mut total_trades = 0usize;
        let mut winning_trades = 0usize;
        let mut total_pnl = 0.0_f64;

        for trade in trades {
            total_trades += 1;
            if trade.is_win() {
                winning_trades += 1;
            }
            total_pnl += trade.pnl;
        }

        let win_ratio = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64 * 100.0
        } else {
            0.0
        };

        Summary {
            total_trades,
            winning_trades,
            win_ratio,
            total_pnl,
        }
    }

    /// Aggregate across several instruments' logs.
    pub fn from_logs<'a, I>(logs: I) -> Self
    where
        I: IntoIterator<Item = &'a TradeLog>,
    {
        Self::from_trades(logs.into_iter().flat_map(|log| log.trades.iter()))
    }

    /// Ratio and P&L rounded to two decimals for presentation.
    pub fn rounded(&self) -> Self {
        Summary {
            win_ratio: round2(self.win_ratio),
            total_pnl: round2(self.total_pnl),
            ..self.clone()
        }
    }
}

/// Per-instrument breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSummary {
    pub symbol: String,
    pub summary: Summary,
}

impl InstrumentSummary {
    pub fn compute_per_instrument(logs: &[TradeLog]) -> Vec<InstrumentSummary> {
        logs.iter()
            .map(|log| InstrumentSummary {
                symbol: log.symbol.clone(),
                summary: Summary::from_trades(&log.trades),
            })
            .collect()
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_trade(pnl: f64) -> Trade {
        let buy_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Trade {
            buy_date,
            buy_price: 100.0,
            sell_date: buy_date + chrono::Duration::days(5),
            sell_price: 100.0 + pnl,
            pnl,
        }
    }

    fn make_log(symbol: &str, pnls: &[f64]) -> TradeLog {
        TradeLog {
            symbol: symbol.to_string(),
            trades: pnls.iter().map(|&p| make_trade(p)).collect(),
        }
    }

    #[test]
    fn empty_summary() {
        let summary = Summary::from_trades(&Vec::<Trade>::new());
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.winning_trades, 0);
        assert_relative_eq!(summary.win_ratio, 0.0);
        assert_relative_eq!(summary.total_pnl, 0.0);
    }

    #[test]
    fn mixed_trades() {
        let trades = vec![make_trade(5.0), make_trade(-2.0), make_trade(3.0)];
        let summary = Summary::from_trades(&trades);

        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.winning_trades, 2);
        assert_relative_eq!(summary.win_ratio, 200.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(summary.total_pnl, 6.0);

        let rounded = summary.rounded();
        assert_relative_eq!(rounded.win_ratio, 66.67);
        assert_relative_eq!(rounded.total_pnl, 6.0);
    }

    #[test]
    fn breakeven_is_not_a_win() {
        let trades = vec![make_trade(0.0), make_trade(0.0)];
        let summary = Summary::from_trades(&trades);
        assert_eq!(summary.winning_trades, 0);
        assert_relative_eq!(summary.win_ratio, 0.0);
    }

    #[test]
    fn negative_total_pnl() {
        let trades = vec![make_trade(-4.0), make_trade(1.5)];
        let summary = Summary::from_trades(&trades);
        assert_relative_eq!(summary.total_pnl, -2.5);
        assert_relative_eq!(summary.win_ratio, 50.0);
    }

    #[test]
    fn aggregate_across_logs() {
        let logs = vec![
            make_log("RELIANCE.NS", &[5.0, -2.0]),
            make_log("INFY.NS", &[]),
            make_log("TCS.NS", &[3.0]),
        ];
        let summary = Summary::from_logs(&logs);
        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.winning_trades, 2);
        assert_relative_eq!(summary.total_pnl, 6.0);
    }

    #[test]
    fn per_instrument_breakdown() {
        let logs = vec![make_log("RELIANCE.NS", &[5.0, -2.0]), make_log("INFY.NS", &[])];
        let per = InstrumentSummary::compute_per_instrument(&logs);

        assert_eq!(per.len(), 2);
        assert_eq!(per[0].symbol, "RELIANCE.NS");
        assert_eq!(per[0].summary.total_trades, 2);
        assert_relative_eq!(per[0].summary.win_ratio, 50.0);
        assert_eq!(per[1].summary.total_trades, 0);
    }

    #[test]
    fn round2_behaviour() {
        assert_relative_eq!(round2(66.666_666), 66.67);
        assert_relative_eq!(round2(-1.234), -1.23);
    }
}
