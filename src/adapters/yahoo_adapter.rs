//! Yahoo Finance data adapter.
//!
//! Fetches daily bars from the v8 chart endpoint with a blocking client.
//! Transport errors, 429s and 5xx responses are retried with exponential
//! backoff; every other failure is returned straight away. After each
//! successful call the adapter sleeps for the configured pause so that
//! back-to-back fetches stay polite.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::{OhlcvBar, TimeSeries};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    pause: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooAdapter {
    pub fn new(pause: Duration) -> Result<Self, ScreenerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ScreenerError::ConfigInvalid {
                section: "data".into(),
                key: "fetcher".into(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            pause,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp()).unwrap_or(0);
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(start_ts);
        format!("{BASE_URL}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d")
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<TimeSeries, ScreenerError> {
        let fetch_error = |reason: String| ScreenerError::DataFetch {
            symbol: symbol.to_string(),
            reason,
        };

        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) => return Err(fetch_error(format!("{}: {}", err.code, err.description))),
            (None, None) => return Err(fetch_error("no chart data returned".into())),
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| fetch_error("no chart data returned".into()))?;

        let timestamps = data
            .timestamp
            .filter(|t| !t.is_empty())
            .ok_or_else(|| fetch_error("incomplete price data: no timestamps".into()))?;
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| fetch_error("incomplete price data: no quotes".into()))?;
        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);

        let value = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten().unwrap_or(f64::NAN);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| fetch_error(format!("invalid timestamp: {ts}")))?;
            bars.push(OhlcvBar {
                date,
                open: value(&quote.open, i),
                high: value(&quote.high, i),
                low: value(&quote.low, i),
                close: value(&quote.close, i),
                volume: value(&quote.volume, i),
            });
        }

        Ok(TimeSeries::from_bars(symbol, bars))
    }

    fn fetch_with_retry(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries, ScreenerError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(symbol, attempt, delay_ms = delay.as_millis() as u64, "retrying fetch");
                std::thread::sleep(delay);
            }

            let fetch_error = |reason: String| ScreenerError::DataFetch {
                symbol: symbol.to_string(),
                reason,
            };

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        last_error = Some(fetch_error(format!("HTTP {status}")));
                        continue;
                    }
                    if !status.is_success() {
                        return Err(fetch_error(format!("HTTP {status}")));
                    }
                    let chart: ChartResponse = resp
                        .json()
                        .map_err(|e| fetch_error(format!("malformed response: {e}")))?;
                    return Self::parse_response(symbol, chart);
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(fetch_error(e.to_string()));
                }
                Err(e) => return Err(fetch_error(e.to_string())),
            }
        }

        let err = last_error.unwrap_or_else(|| ScreenerError::DataFetch {
            symbol: symbol.to_string(),
            reason: "retries exhausted".into(),
        });
        warn!(symbol, error = %err, "giving up after retries");
        Err(err)
    }
}

impl DataPort for YahooAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<TimeSeries, ScreenerError> {
        let result = self.fetch_with_retry(symbol, start_date, end_date);
        if result.is_ok() && !self.pause.is_zero() {
            std::thread::sleep(self.pause);
        }
        result
    }
}
