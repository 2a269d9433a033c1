//! Typed application configuration.
//!
//! Built from any [`ConfigPort`] and validated up front, so that a run never
//! starts with a bad universe, fetcher or strategy declaration.
//!
//! Layout:
//! - `[data]`: `fetcher`, `lookback_days`, `csv_dir`, `pause_ms`
//! - `[stock_pool]`: `path`
//! - `[universe.<key>]`: `market`, `type` (`file` | `inline`), `path`, `symbols`
//! - `[strategy.<label>]`: `type`, `enabled`, optional `name`, and every other
//!   key is a strategy parameter

use crate::domain::error::ScreenerError;
use crate::domain::strategy::StrategyParams;
use crate::domain::universe::{collect_symbols, UniverseSource};
use crate::ports::config_port::ConfigPort;
use chrono::{Duration, NaiveDate};
use std::path::{Path, PathBuf};

const UNIVERSE_PREFIX: &str = "universe.";
const STRATEGY_PREFIX: &str = "strategy.";
const STRATEGY_RESERVED_KEYS: &[&str] = &["type", "enabled", "name"];

pub const DEFAULT_LOOKBACK_DAYS: i64 = 120;
pub const DEFAULT_PAUSE_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetcherKind {
    Csv,
    Yahoo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    pub kind: FetcherKind,
    pub lookback_days: i64,
    /// Directory of `<SYMBOL>.csv` files, for the CSV fetcher.
    pub csv_dir: PathBuf,
    /// Politeness delay between remote requests.
    pub pause_ms: u64,
}

impl FetcherConfig {
    /// The `[today - lookback_days, today]` fetch window.
    ///
    /// Fails when the window would start before the earliest representable date.
    pub fn period(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ScreenerError> {
        Duration::try_days(self.lookback_days)
            .and_then(|lookback| today.checked_sub_signed(lookback))
            .map(|start| (start, today))
            .ok_or_else(|| {
                invalid(
                    "data",
                    "lookback_days",
                    format!("{} days before {today} is out of range", self.lookback_days),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub name: String,
    pub strategy_type: String,
    pub params: StrategyParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockPoolConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub universe: Vec<UniverseSource>,
    pub fetcher: FetcherConfig,
    /// Enabled strategies only, in declaration order.
    pub strategies: Vec<StrategyConfig>,
    pub stock_pool: StockPoolConfig,
}

impl AppConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenerError> {
        Ok(Self {
            universe: parse_universe(config)?,
            fetcher: parse_fetcher(config)?,
            strategies: parse_strategies(config)?,
            stock_pool: parse_stock_pool(config)?,
        })
    }

    /// Every universe symbol, upper-cased and de-duplicated in first-seen order.
    pub fn all_symbols(&self, base_path: &Path) -> Result<Vec<String>, ScreenerError> {
        Ok(collect_symbols(&self.universe, base_path)?)
    }
}

fn parse_universe(config: &dyn ConfigPort) -> Result<Vec<UniverseSource>, ScreenerError> {
    let mut sources = Vec::new();
    for section in config.sections() {
        let Some(key) = section.strip_prefix(UNIVERSE_PREFIX) else {
            continue;
        };
        let market = config
            .get_string(&section, "market")
            .unwrap_or_else(|| key.to_string());
        let source_type = config
            .get_string(&section, "type")
            .ok_or_else(|| ScreenerError::ConfigMissing {
                section: section.clone(),
                key: "type".into(),
            })?;
        let path = config.get_string(&section, "path");
        let symbols = config.get_string(&section, "symbols");
        sources.push(UniverseSource::from_parts(
            &market,
            &source_type,
            path.as_deref(),
            symbols.as_deref(),
        )?);
    }
    Ok(sources)
}

fn parse_fetcher(config: &dyn ConfigPort) -> Result<FetcherConfig, ScreenerError> {
    let kind = match config.get_string("data", "fetcher").as_deref().map(str::trim) {
        None | Some("yahoo") => FetcherKind::Yahoo,
        Some("csv") => FetcherKind::Csv,
        Some(other) => {
            return Err(invalid("data", "fetcher", format!("unknown fetcher '{other}' (expected csv or yahoo)")));
        }
    };

    let lookback_days = match config.get_string("data", "lookback_days") {
        None => DEFAULT_LOOKBACK_DAYS,
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(days) if days > 0 && Duration::try_days(days).is_some() => days,
            Ok(days) if days > 0 => {
                return Err(invalid("data", "lookback_days", format!("lookback_days {days} is too large")));
            }
            _ => return Err(invalid("data", "lookback_days", "lookback_days must be a positive integer")),
        },
    };

    let pause_ms = match config.get_string("data", "pause_ms") {
        None => DEFAULT_PAUSE_MS,
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("data", "pause_ms", "pause_ms must be a non-negative integer"))?,
    };

    let csv_dir = config
        .get_string("data", "csv_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    Ok(FetcherConfig {
        kind,
        lookback_days,
        csv_dir,
        pause_ms,
    })
}

fn parse_strategies(config: &dyn ConfigPort) -> Result<Vec<StrategyConfig>, ScreenerError> {
    let mut strategies = Vec::new();
    for section in config.sections() {
        let Some(label) = section.strip_prefix(STRATEGY_PREFIX) else {
            continue;
        };
        if !config.get_bool(&section, "enabled", true)? {
            continue;
        }
        let strategy_type = config
            .get_string(&section, "type")
            .ok_or_else(|| ScreenerError::ConfigMissing {
                section: section.clone(),
                key: "type".into(),
            })?;
        let name = config
            .get_string(&section, "name")
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| label.to_string());
        let params = config
            .keys(&section)
            .into_iter()
            .filter(|k| !STRATEGY_RESERVED_KEYS.contains(&k.as_str()))
            .map(|k| {
                let value = config.get_string(&section, &k).unwrap_or_default();
                (k, value)
            })
            .collect();
        strategies.push(StrategyConfig {
            name,
            strategy_type: strategy_type.trim().to_string(),
            params,
        });
    }
    Ok(strategies)
}

fn parse_stock_pool(config: &dyn ConfigPort) -> Result<StockPoolConfig, ScreenerError> {
    match config.get_string("stock_pool", "path") {
        Some(p) if !p.trim().is_empty() => Ok(StockPoolConfig {
            path: PathBuf::from(p.trim()),
        }),
        _ => Err(ScreenerError::ConfigMissing {
            section: "stock_pool".into(),
            key: "path".into(),
        }),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
