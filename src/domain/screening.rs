//! Screening pipeline: fetch each symbol, run every strategy, record passes.
//!
//! Symbols are processed sequentially in the order given, and strategies in
//! their configured order. A symbol whose data cannot be fetched is skipped
//! and the run carries on. The stock pool is saved exactly once, after every
//! symbol has been processed.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::TimeSeries;
use crate::domain::stock_pool::StockPool;
use crate::domain::strategy::{Strategy, StrategyResult};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::{debug, info};

/// A symbol that passed at least one strategy, with its results in strategy order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningCandidate {
    pub symbol: String,
    pub results: Vec<StrategyResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct ScreeningRun {
    pub candidates: Vec<ScreeningCandidate>,
    pub skipped: Vec<SkippedSymbol>,
}

enum FetchOutcome {
    Fetched(TimeSeries),
    Skipped(SkipReason),
}

pub struct ScreeningEngine<'a> {
    data_port: &'a dyn DataPort,
    strategies: Vec<Strategy>,
    stock_pool: StockPool,
}

impl<'a> ScreeningEngine<'a> {
    pub fn new(data_port: &'a dyn DataPort, strategies: Vec<Strategy>, stock_pool: StockPool) -> Self {
        Self {
            data_port,
            strategies,
            stock_pool,
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn stock_pool(&self) -> &StockPool {
        &self.stock_pool
    }

    pub fn into_stock_pool(self) -> StockPool {
        self.stock_pool
    }

    /// Screen `symbols` over `[start, end]`, returning the passing candidates.
    pub fn screen(
        &mut self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScreeningCandidate>, ScreenerError> {
        self.run(symbols, start, end).map(|run| run.candidates)
    }

    /// Like [`screen`](Self::screen), but also reports which symbols were skipped.
    ///
    /// The only error is a failure to persist the stock pool.
    pub fn run(
        &mut self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ScreeningRun, ScreenerError> {
        info!(
            symbols = symbols.len(),
            strategies = self.strategies.len(),
            %start,
            %end,
            "screening started"
        );

        let mut run = ScreeningRun::default();

        for symbol in symbols {
            let history = match self.fetch_history(symbol, start, end) {
                FetchOutcome::Fetched(history) => history,
                FetchOutcome::Skipped(reason) => {
                    run.skipped.push(SkippedSymbol {
                        symbol: symbol.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let results: Vec<StrategyResult> = self
                .strategies
                .iter()
                .filter_map(|strategy| strategy.evaluate(symbol, &history))
                .collect();

            for result in &results {
                self.stock_pool.add(result);
            }

            if !results.is_empty() {
                debug!(symbol = %symbol, passed = results.len(), "candidate found");
                run.candidates.push(ScreeningCandidate {
                    symbol: symbol.clone(),
                    results,
                });
            }
        }

        self.stock_pool.save()?;

        info!(
            candidates = run.candidates.len(),
            skipped = run.skipped.len(),
            pool_entries = self.stock_pool.len(),
            pool = %self.stock_pool.path().display(),
            "screening finished"
        );

        Ok(run)
    }

    fn fetch_history(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> FetchOutcome {
        match self.data_port.fetch_ohlcv(symbol, start, end) {
            Ok(history) if history.is_empty() => FetchOutcome::Skipped(SkipReason::NoData),
            Ok(history) => FetchOutcome::Fetched(history),
            Err(e) => FetchOutcome::Skipped(SkipReason::FetchFailed(e.to_string())),
        }
    }
}
