//! RSI oversold-rebound mean-reversion screen.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::TimeSeries;
use crate::domain::strategy::{Metadata, ParamReader, StrategyParams, StrategyResult};

/// Bars inspected for a recent oversold dip.
pub const DIP_LOOKBACK: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RsiRebound {
    pub name: String,
    pub period: usize,
    pub oversold: f64,
    pub exit_threshold: f64,
}

impl RsiRebound {
    pub const TYPE_NAME: &'static str = "rsi_rebound";
    const PARAMS: &'static [&'static str] = &["period", "oversold", "exit_threshold"];

    pub const DEFAULT_PERIOD: usize = 14;
    pub const DEFAULT_OVERSOLD: f64 = 30.0;
    pub const DEFAULT_EXIT_THRESHOLD: f64 = 40.0;

    pub fn from_params(name: &str, params: &StrategyParams) -> Result<Self, ScreenerError> {
        let reader = ParamReader::new(name, params);
        reader.only(Self::PARAMS)?;

        let period = reader.usize_or("period", Self::DEFAULT_PERIOD)?;
        let oversold = reader.f64_or("oversold", Self::DEFAULT_OVERSOLD)?;
        let exit_threshold = reader.f64_or("exit_threshold", Self::DEFAULT_EXIT_THRESHOLD)?;

        if period < 1 {
            return Err(reader.invalid("period", "period must be at least 1"));
        }

        Ok(Self {
            name: name.to_string(),
            period,
            oversold,
            exit_threshold,
        })
    }

    pub fn evaluate(&self, symbol: &str, history: &TimeSeries) -> Option<StrategyResult> {
        if history.len() <= self.period {
            return None;
        }

        let rsi = calculate_rsi(&history.closes(), self.period);

        let latest = rsi.latest()?;
        if latest > self.exit_threshold {
            return None;
        }

        let min_rsi = rsi.trailing_min(DIP_LOOKBACK)?;
        if min_rsi > self.oversold {
            return None;
        }

        Some(StrategyResult {
            symbol: symbol.to_string(),
            strategy: self.name.clone(),
            score: self.exit_threshold - latest,
            metadata: Metadata::from([("rsi".to_string(), latest), ("min_rsi".to_string(), min_rsi)]),
        })
    }
}
