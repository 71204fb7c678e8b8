use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::SimulationError;

pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closing prices for `[start, end)`, oldest first.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, SimulationError>;
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartApiError>,
}

#[derive(Deserialize)]
struct ChartApiError {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance v8 chart endpoint, the same feed `yfinance` reads.
pub struct YahooFinanceSource {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinanceSource {
    pub fn new() -> Result<Self, SimulationError> {
        Self::with_base_url(YAHOO_CHART_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, SimulationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; orda-simulation)")
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl PriceSource for YahooFinanceSource {
    async fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, SimulationError> {
        let url = format!("{}/v8/finance/chart/{ticker}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("period1", unix_midnight(start).to_string()),
                ("period2", unix_midnight(end).to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let envelope: ChartEnvelope = response.json().await?;
        if let Some(err) = envelope.chart.error {
            return Err(SimulationError::PriceApi {
                ticker: ticker.to_string(),
                message: err.description,
            });
        }
        if !status.is_success() {
            return Err(SimulationError::PriceApi {
                ticker: ticker.to_string(),
                message: status.to_string(),
            });
        }

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let offset = result.meta.gmtoffset;
        let mut series: Vec<DailyClose> = result
            .timestamp
            .iter()
            .zip(closes)
            .filter_map(|(&ts, close)| {
                let close = close?;
                let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
                (date >= start && date < end).then_some(DailyClose { date, close })
            })
            .collect();
        series.sort_by_key(|c| c.date);
        tracing::debug!(ticker, points = series.len(), "daily closes fetched");
        Ok(series)
    }
}
