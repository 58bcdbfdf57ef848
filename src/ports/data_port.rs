//! Market data access port trait.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

/// A source of daily bars. Implementations are shared across the per-instrument
/// workers, hence `Sync`.
pub trait DataPort: Sync {
    fn name(&self) -> &str;

    /// Bars for `symbol` within `[start_date, end_date]`, in the order the
    /// source provides them. An empty vector means the source had no data.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SigtraderError>;
}
