//! Single-position trade simulator.
//!
//! Walks usable indicator rows in date order as a `Flat | Long` state
//! machine. The last row is never visited and the second-to-last row is the
//! forced-exit row: a position open there is always closed, and no entry is
//! taken on it.

use crate::domain::frame::IndicatorRow;
use crate::domain::position::{Position, PositionState, TradeLog};
use log::{debug, info};

pub const DEFAULT_HOLD_DAYS: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Calendar days after entry at which a position is closed.
    pub hold_days: i64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            hold_days: DEFAULT_HOLD_DAYS,
        }
    }
}

/// Runs the state machine over `rows` with the matching `signals`.
///
/// Fewer than two rows (or mismatched lengths) yield an empty log.
pub fn simulate_trades(
    symbol: &str,
    rows: &[IndicatorRow],
    signals: &[bool],
    config: &SimulatorConfig,
) -> TradeLog {
    let mut trade_log = TradeLog::empty(symbol);
    if rows.len() < 2 || rows.len() != signals.len() {
        return trade_log;
    }

    let forced_exit = rows.len() - 2;
    let mut state = PositionState::Flat;

    for (i, row) in rows.iter().enumerate().take(rows.len() - 1) {
        state = match state {
            PositionState::Flat => {
                if signals[i] && i < forced_exit {
                    debug!("{symbol}: buy on {} at {:.2}", row.date, row.close);
                    PositionState::Long(Position {
                        entry_date: row.date,
                        entry_price: row.close,
                    })
                } else {
                    PositionState::Flat
                }
            }
            PositionState::Long(position) => {
                if position.days_held(row.date) >= config.hold_days || i == forced_exit {
                    let trade = position.close(row.date, row.close);
                    debug!(
                        "{symbol}: sell on {} at {:.2} | P&L: {:.2}",
                        trade.sell_date, trade.sell_price, trade.pnl
                    );
                    trade_log.trades.push(trade);
                    PositionState::Flat
                } else {
                    PositionState::Long(position)
                }
            }
        };
    }

    if let PositionState::Long(position) = state {
        debug!(
            "{symbol}: discarding position opened {} with no exit row",
            position.entry_date
        );
    }

    if trade_log.is_empty() {
        info!("{symbol}: no trades executed");
    } else {
        info!("{symbol}: completed backtest with {} trades", trade_log.len());
    }
    trade_log
}
