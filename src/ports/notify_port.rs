//! Aggregate notification port trait.

use crate::domain::error::SigtraderError;
use crate::domain::metrics::Summary;
use chrono::NaiveDateTime;

pub trait Notifier {
    fn notify(&self, summary: &Summary, timestamp: NaiveDateTime) -> Result<(), SigtraderError>;
}

/// Used when no notification channel is configured.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _summary: &Summary, _timestamp: NaiveDateTime) -> Result<(), SigtraderError> {
        Ok(())
    }
}

/// Plain-text message body for a run summary.
pub fn format_summary_message(summary: &Summary, timestamp: NaiveDateTime) -> String {
    let s = summary.rounded();
    format!(
        "Backtest results\n\
         Time: {}\n\
         Total Trades: {}\n\
         Winning Trades: {}\n\
         Win Ratio: {:.2}%\n\
         Total P&L: {:.2}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        s.total_trades,
        s.winning_trades,
        s.win_ratio,
        s.total_pnl,
    )
}
