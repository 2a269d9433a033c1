#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use screener::domain::error::ScreenerError;
pub use screener::domain::ohlcv::{OhlcvBar, TimeSeries};
use screener::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn called_symbols(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(s, _, _)| s.clone()).collect()
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TimeSeries, ScreenerError> {
        self.calls
            .borrow_mut()
            .push((symbol.to_string(), start_date, end_date));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ScreenerError::DataFetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(TimeSeries::from_bars(
            symbol,
            self.data.get(symbol).cloned().unwrap_or_default(),
        ))
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume,
    }
}

/// One bar per calendar day starting at `start`.
pub fn bars_from_closes(start: NaiveDate, closes: &[f64], volume: f64) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + Duration::days(i as i64), close, volume))
        .collect()
}

/// Write `bars` as `<dir>/<symbol>.csv` in the layout the CSV fetcher reads.
pub fn write_csv(dir: &Path, symbol: &str, bars: &[OhlcvBar]) {
    let mut file = std::fs::File::create(dir.join(format!("{symbol}.csv"))).unwrap();
    writeln!(file, "date,open,high,low,close,volume").unwrap();
    for bar in bars {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        )
        .unwrap();
    }
}

/// Declining then flat: a 3/5 SMA crossover fires on the last bar.
pub const CROSSOVER_CLOSES: [f64; 13] = [
    15.0, 14.5, 14.0, 13.5, 13.0, 12.8, 12.5, 12.3, 12.1, 12.0, 12.2, 12.2, 12.2,
];

/// Straight decline with a small bounce: a period-3 RSI rebound fires on the last bar.
pub const REBOUND_CLOSES: [f64; 11] = [
    20.0, 19.5, 19.0, 18.5, 18.0, 17.5, 17.0, 16.8, 16.5, 16.7, 17.0,
];

pub const FLAT_CLOSES: [f64; 13] = [10.0; 13];
