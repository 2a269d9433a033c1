//! CSV file data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv` files with a `date,open,high,low,close,volume`
//! header. Rows with an empty or non-numeric close are dropped; an empty or
//! non-numeric volume is kept as missing.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::{OhlcvBar, TimeSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_field(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TimeSeries, ScreenerError> {
        let fetch_error = |reason: String| ScreenerError::DataFetch {
            symbol: symbol.to_string(),
            reason,
        };

        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| fetch_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| fetch_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| fetch_error("missing date column".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| fetch_error(format!("invalid date '{}': {}", date_str, e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(OhlcvBar {
                date,
                open: parse_field(record.get(1)),
                high: parse_field(record.get(2)),
                low: parse_field(record.get(3)),
                close: parse_field(record.get(4)),
                volume: parse_field(record.get(5)),
            });
        }

        Ok(TimeSeries::from_bars(symbol, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";

        fs::write(path.join("AAPL.csv"), csv_content).unwrap();
        fs::write(
            path.join("GAPS.csv"),
            "date,open,high,low,close,volume\n\
             2024-01-15,1.0,1.0,1.0,1.0,\n\
             2024-01-16,1.0,1.0,1.0,,100\n\
             2024-01-17,1.0,1.0,1.0,2.0,100\n",
        )
        .unwrap();
        fs::write(path.join("BAD.csv"), "date,open,high,low,close,volume\nJan 15,1,1,1,1,1\n").unwrap();

        (dir, path)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fetch_returns_sorted_bars() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("AAPL", date(2024, 1, 15), date(2024, 1, 17)).unwrap();

        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 3);
        let first = &series.bars()[0];
        assert_eq!(first.date, date(2024, 1, 15));
        assert_eq!(first.open, 100.0);
        assert_eq!(first.high, 110.0);
        assert_eq!(first.low, 90.0);
        assert_eq!(first.close, 105.0);
        assert_eq!(first.volume, 50000.0);
    }

    #[test]
    fn fetch_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("AAPL", date(2024, 1, 16), date(2024, 1, 16)).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.last_date(), Some(date(2024, 1, 16)));
    }

    #[test]
    fn fetch_drops_missing_closes_and_keeps_missing_volume() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let series = adapter.fetch_ohlcv("GAPS", date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(series.closes(), vec![1.0, 2.0]);
        assert!(series.bars()[0].volume.is_nan());
    }

    #[test]
    fn fetch_missing_file_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let result = adapter.fetch_ohlcv("XYZ", date(2024, 1, 1), date(2024, 1, 31));

        assert!(matches!(result, Err(ScreenerError::DataFetch { symbol, .. }) if symbol == "XYZ"));
    }

    #[test]
    fn fetch_malformed_date_is_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert!(adapter.fetch_ohlcv("BAD", date(2024, 1, 1), date(2024, 1, 31)).is_err());
    }
}
