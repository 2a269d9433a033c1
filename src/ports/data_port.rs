//! Historical price data port.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::TimeSeries;
use chrono::NaiveDate;

/// Source of daily bars.
///
/// Implementations must tolerate back-to-back calls; any pacing between
/// requests is their own concern. Every failure (transport, HTTP status,
/// malformed or incomplete payload, timeout) is returned as an error and the
/// caller treats them all alike.
pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TimeSeries, ScreenerError>;
}
