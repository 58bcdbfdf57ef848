//! Result sink port trait.

use crate::domain::backtest::BatchReport;
use crate::domain::error::SigtraderError;
use crate::domain::position::TradeLog;
use chrono::NaiveDateTime;
use log::warn;

/// Column headers of a persisted trade log.
pub const TRADE_LOG_HEADERS: [&str; 5] =
    ["Buy Date", "Buy Price", "Sell Date", "Sell Price", "P&L"];

/// Port for persisting backtest results.
pub trait ResultSink {
    /// Writes one instrument's trades. An empty log still produces a header.
    fn write_trade_log(&self, log: &TradeLog) -> Result<(), SigtraderError>;

    /// Default implementation: writes every instrument's log, substituting an
    /// empty log for skipped instruments. Rejected instruments get no file.
    fn write_batch(
        &self,
        report: &BatchReport,
        _written_at: NaiveDateTime,
    ) -> Result<(), SigtraderError> {
        for instrument in &report.instruments {
            match &instrument.outcome {
                Ok(log) => self.write_trade_log(log)?,
                Err(e) if e.is_skip() => {
                    self.write_trade_log(&TradeLog::empty(&instrument.symbol))?
                }
                Err(e) => warn!("{}: rejected, no trade log written: {}", instrument.symbol, e),
            }
        }
        Ok(())
    }
}
