//! Technical indicators used by the screening strategies.
//!
//! Every indicator produces one [`IndicatorPoint`] per input value, so index `i`
//! of a series always lines up with bar `i` of the history it was computed from.
//! Points that cannot be computed (window not yet full, undefined ratio) are
//! marked invalid rather than filled with a sentinel.

pub mod rsi;
pub mod sma;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub const INVALID: IndicatorPoint = IndicatorPoint {
        valid: false,
        value: 0.0,
    };

    pub fn new(value: f64) -> Self {
        Self { valid: true, value }
    }

    pub fn get(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value `back` points before the latest one (`0` = latest).
    pub fn back(&self, back: usize) -> Option<f64> {
        let idx = self.values.len().checked_sub(back + 1)?;
        self.values[idx].get()
    }

    pub fn latest(&self) -> Option<f64> {
        self.back(0)
    }

    /// Minimum over the valid points among the trailing `n`.
    pub fn trailing_min(&self, n: usize) -> Option<f64> {
        let start = self.values.len().saturating_sub(n);
        self.values[start..]
            .iter()
            .filter_map(IndicatorPoint::get)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(points: &[Option<f64>]) -> IndicatorSeries {
        IndicatorSeries {
            indicator_type: IndicatorType::Sma(1),
            values: points
                .iter()
                .map(|p| p.map_or(IndicatorPoint::INVALID, IndicatorPoint::new))
                .collect(),
        }
    }

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
    }

    #[test]
    fn back_indexes_from_the_end() {
        let s = series(&[Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(s.latest(), Some(3.0));
        assert_eq!(s.back(1), Some(2.0));
        assert_eq!(s.back(2), Some(1.0));
        assert_eq!(s.back(3), None);
    }

    #[test]
    fn back_on_invalid_point_is_none() {
        let s = series(&[None, Some(2.0)]);
        assert_eq!(s.back(1), None);
    }

    #[test]
    fn trailing_min_skips_invalid_points() {
        let s = series(&[Some(0.5), None, Some(4.0), Some(2.0)]);
        assert_eq!(s.trailing_min(3), Some(2.0));
        assert_eq!(s.trailing_min(10), Some(0.5));
    }

    #[test]
    fn trailing_min_all_invalid() {
        let s = series(&[None, None]);
        assert_eq!(s.trailing_min(5), None);
    }
}
