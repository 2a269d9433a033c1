//! Screening strategies.
//!
//! A [`Strategy`] is a stateless, parameterised rule mapping a symbol's
//! [`TimeSeries`] to an optional [`StrategyResult`]. `None` is the ordinary
//! "no signal" outcome: too little history, an undefined indicator, or the
//! trigger conditions simply not being met. Evaluation never fails; invalid
//! parameters are rejected when the strategy is constructed.
//!
//! The set of variants is closed. Adding a strategy means adding a variant
//! here and an entry in [`factory::REGISTRY`].

pub mod factory;
pub mod ma_crossover;
pub mod rsi_rebound;

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::TimeSeries;
use indexmap::IndexMap;
use std::collections::BTreeMap;

pub use ma_crossover::MovingAverageCrossover;
pub use rsi_rebound::RsiRebound;

/// Raw `name = value` parameter overrides, as read from configuration.
pub type StrategyParams = BTreeMap<String, String>;

/// Named metrics attached to a result, kept in the order the strategy inserted them.
pub type Metadata = IndexMap<String, f64>;

/// A passing evaluation of one strategy against one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyResult {
    pub symbol: String,
    pub strategy: String,
    /// Higher is a stronger signal; no fixed range.
    pub score: f64,
    pub metadata: Metadata,
}

impl StrategyResult {
    pub fn is_finite(&self) -> bool {
        self.score.is_finite() && self.metadata.values().all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    MovingAverageCrossover(MovingAverageCrossover),
    RsiRebound(RsiRebound),
}

impl Strategy {
    /// The user-facing label results are tagged with.
    pub fn name(&self) -> &str {
        match self {
            Strategy::MovingAverageCrossover(s) => &s.name,
            Strategy::RsiRebound(s) => &s.name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Strategy::MovingAverageCrossover(_) => MovingAverageCrossover::TYPE_NAME,
            Strategy::RsiRebound(_) => RsiRebound::TYPE_NAME,
        }
    }

    /// Minimum number of bars needed before a signal can be produced.
    pub fn min_bars(&self) -> usize {
        match self {
            Strategy::MovingAverageCrossover(s) => s.long_window.saturating_add(1),
            Strategy::RsiRebound(s) => s.period.saturating_add(1),
        }
    }

    /// A result whose score or metadata is not finite is treated as no signal.
    pub fn evaluate(&self, symbol: &str, history: &TimeSeries) -> Option<StrategyResult> {
        let result = match self {
            Strategy::MovingAverageCrossover(s) => s.evaluate(symbol, history),
            Strategy::RsiRebound(s) => s.evaluate(symbol, history),
        };
        result.filter(StrategyResult::is_finite)
    }
}

/// Typed access to a strategy's parameter overrides.
///
/// Every error names the strategy's config section (`strategy.<label>`) and the
/// offending key.
pub(crate) struct ParamReader<'a> {
    section: String,
    params: &'a StrategyParams,
}

impl<'a> ParamReader<'a> {
    pub(crate) fn new(label: &str, params: &'a StrategyParams) -> Self {
        Self {
            section: format!("strategy.{label}"),
            params,
        }
    }

    /// Reject any key not in `known`.
    pub(crate) fn only(&self, known: &[&str]) -> Result<(), ScreenerError> {
        match self.params.keys().find(|k| !known.contains(&k.as_str())) {
            Some(key) => Err(self.invalid(key, format!("unknown parameter (expected one of: {})", known.join(", ")))),
            None => Ok(()),
        }
    }

    pub(crate) fn usize_or(&self, key: &str, default: usize) -> Result<usize, ScreenerError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| self.invalid(key, format!("expected a non-negative integer, got '{raw}'"))),
        }
    }

    pub(crate) fn f64_or(&self, key: &str, default: f64) -> Result<f64, ScreenerError> {
        match self.params.get(key) {
            None => Ok(default),
            Some(raw) => match raw.trim().replace('_', "").parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(self.invalid(key, format!("expected a number, got '{raw}'"))),
            },
        }
    }

    pub(crate) fn invalid(&self, key: &str, reason: impl Into<String>) -> ScreenerError {
        ScreenerError::ConfigInvalid {
            section: self.section.clone(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
