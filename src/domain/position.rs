//! Open position state and completed trade records.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
}

impl Position {
    pub fn days_held(&self, date: NaiveDate) -> i64 {
        (date - self.entry_date).num_days()
    }

    /// Consumes the position into a completed trade.
    pub fn close(self, sell_date: NaiveDate, sell_price: f64) -> Trade {
        Trade {
            buy_date: self.entry_date,
            buy_price: self.entry_price,
            sell_date,
            sell_price,
            pnl: sell_price - self.entry_price,
        }
    }
}

/// Simulator state for a single instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    Long(Position),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub sell_date: NaiveDate,
    pub sell_price: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn holding_days(&self) -> i64 {
        (self.sell_date - self.buy_date).num_days()
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}

/// Completed trades for one instrument, in date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLog {
    pub symbol: String,
    pub trades: Vec<Trade>,
}

impl TradeLog {
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            trades: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}
