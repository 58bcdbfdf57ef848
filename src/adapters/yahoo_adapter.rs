//! Yahoo Finance data adapter.
//!
//! Fetches daily bars from Yahoo's v8 chart API with retry and exponential
//! backoff. Rows without a close are dropped; an unknown symbol yields an
//! empty series rather than an error.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

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
    /// Exchange offset from UTC in seconds.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, SigtraderError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, SigtraderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| SigtraderError::DataSource {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive
        let end_ts = (end + chrono::Duration::days(1))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "{}/v8/finance/chart/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d",
            self.base_url
        )
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, SigtraderError> {
        let Some(result) = resp.chart.result else {
            return match resp.chart.error {
                Some(err) if err.code == "Not Found" => {
                    warn!("{symbol}: not found on Yahoo ({})", err.description);
                    Ok(Vec::new())
                }
                Some(err) => Err(SigtraderError::DataSource {
                    reason: format!("{symbol}: {}: {}", err.code, err.description),
                }),
                None => Err(SigtraderError::DataSource {
                    reason: format!("{symbol}: empty result with no error"),
                }),
            };
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(Vec::new());
        };
        let Some(timestamps) = data.timestamp else {
            return Ok(Vec::new());
        };

        let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| SigtraderError::DataSource {
                reason: format!("{symbol}: no quote data"),
            })?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| SigtraderError::DataSource {
                    reason: format!("{symbol}: invalid timestamp {ts}"),
                })?;

            let Some(close) = quote.close.get(i).copied().flatten() else {
                debug!("{symbol}: dropping {date}, no close");
                continue;
            };

            let mut bar = Bar::new(symbol, date, close);
            if let Some(volume) = quote.volume.get(i).copied().flatten() {
                bar = bar.with_volume(volume);
            }
            bars.push(bar);
        }

        Ok(bars)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, SigtraderError> {
        let url = self.chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!("{symbol}: retry {attempt} after {delay:?}");
                std::thread::sleep(delay);
            }

            match self.client.get(&url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::NOT_FOUND {
                        // body still carries the chart error envelope
                        let chart: ChartResponse = match resp.json() {
                            Ok(chart) => chart,
                            Err(_) => return Ok(Vec::new()),
                        };
                        return Self::parse_response(symbol, chart);
                    }

                    let retryable = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error();
                    if retryable {
                        last_error = Some(format!("HTTP {status} for {symbol}"));
                        continue;
                    }

                    if !status.is_success() {
                        return Err(SigtraderError::DataSource {
                            reason: format!("HTTP {status} for {symbol}"),
                        });
                    }

                    let chart: ChartResponse = resp.json().map_err(|e| SigtraderError::DataSource {
                        reason: format!("failed to parse response for {symbol}: {e}"),
                    })?;
                    return Self::parse_response(symbol, chart);
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(e.to_string());
                        continue;
                    }
                    return Err(SigtraderError::DataSource {
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(SigtraderError::DataSource {
            reason: last_error.unwrap_or_else(|| "max retries exceeded".into()),
        })
    }
}

impl DataPort for YahooAdapter {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, SigtraderError> {
        let bars = self.fetch_with_retry(symbol, start_date, end_date)?;
        // the API may return a bar for the current session beyond end_date
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }
}
