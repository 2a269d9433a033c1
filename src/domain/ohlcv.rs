//! Daily OHLCV bars and the per-symbol time series built from them.

use chrono::NaiveDate;

/// One trading day for one symbol. A missing volume is carried as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Bars for a single symbol, ordered by strictly increasing date.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl TimeSeries {
    /// Build a series from bars in any order.
    ///
    /// Bars whose close is not finite are dropped (never interpolated), the rest
    /// are sorted by date and only the first bar seen for any date is kept.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Self {
        let mut bars: Vec<OhlcvBar> = bars.into_iter().filter(|b| b.close.is_finite()).collect();
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
