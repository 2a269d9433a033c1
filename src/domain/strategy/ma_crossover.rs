//! Moving-average crossover momentum screen.
//!
//! Fires on the bar where the short SMA of closes moves from at-or-below the
//! long SMA to strictly above it, provided trailing average volume clears
//! `min_volume`.

use crate::domain::error::ScreenerError;
use crate::domain::indicator::sma::{calculate_sma, trailing_mean};
use crate::domain::ohlcv::TimeSeries;
use crate::domain::strategy::{Metadata, ParamReader, StrategyParams, StrategyResult};

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageCrossover {
    pub name: String,
    pub short_window: usize,
    pub long_window: usize,
    pub min_volume: f64,
}

impl MovingAverageCrossover {
    pub const TYPE_NAME: &'static str = "moving_average_crossover";
    const PARAMS: &'static [&'static str] = &["short_window", "long_window", "min_volume"];

    pub const DEFAULT_SHORT_WINDOW: usize = 5;
    pub const DEFAULT_LONG_WINDOW: usize = 20;
    pub const DEFAULT_MIN_VOLUME: f64 = 1_000_000.0;

    pub fn from_params(name: &str, params: &StrategyParams) -> Result<Self, ScreenerError> {
        let reader = ParamReader::new(name, params);
        reader.only(Self::PARAMS)?;

        let short_window = reader.usize_or("short_window", Self::DEFAULT_SHORT_WINDOW)?;
        let long_window = reader.usize_or("long_window", Self::DEFAULT_LONG_WINDOW)?;
        let min_volume = reader.f64_or("min_volume", Self::DEFAULT_MIN_VOLUME)?;

        if short_window < 1 {
            return Err(reader.invalid("short_window", "short_window must be at least 1"));
        }
        if long_window <= short_window {
            return Err(reader.invalid(
                "long_window",
                format!("long_window ({long_window}) must be greater than short_window ({short_window})"),
            ));
        }
        if min_volume < 0.0 {
            return Err(reader.invalid("min_volume", "min_volume must be non-negative"));
        }

        Ok(Self {
            name: name.to_string(),
            short_window,
            long_window,
            min_volume,
        })
    }

    pub fn evaluate(&self, symbol: &str, history: &TimeSeries) -> Option<StrategyResult> {
        if history.len() <= self.long_window {
            return None;
        }

        let closes = history.closes();
        let short_ma = calculate_sma(&closes, self.short_window);
        let long_ma = calculate_sma(&closes, self.long_window);

        let short_now = short_ma.latest()?;
        let long_now = long_ma.latest()?;
        if short_now <= long_now || long_now == 0.0 {
            return None;
        }

        // Must have crossed on this bar, not already been above.
        let short_prev = short_ma.back(1)?;
        let long_prev = long_ma.back(1)?;
        if short_prev > long_prev {
            return None;
        }

        let avg_volume = trailing_mean(&history.volumes(), self.long_window)?;
        if avg_volume < self.min_volume {
            return None;
        }

        let slope = match short_ma.back(2) {
            Some(base) if base != 0.0 => short_now / base - 1.0,
            _ => 0.0,
        };

        let metadata = Metadata::from([
            ("short_ma".to_string(), short_now),
            ("long_ma".to_string(), long_now),
            ("avg_volume".to_string(), avg_volume),
            ("slope".to_string(), slope),
        ]);

        Some(StrategyResult {
            symbol: symbol.to_string(),
            strategy: self.name.clone(),
            score: short_now / long_now - 1.0,
            metadata,
        })
    }
}
