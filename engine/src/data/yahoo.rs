// Market data source backed by the Yahoo Finance v8 chart endpoint
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use shared::models::{Bar, Interval, PriceSeries, Timestamp};

use crate::config::settings::ProviderSettings;
use crate::data::source::{BarsRequest, FetchWindow, MarketDataSource};
use crate::error::EngineError;

const CHART_PATH: &str = "v8/finance/chart";
const NOT_FOUND_CODE: &str = "Not Found";

#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize, Debug)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    #[serde(rename = "exchangeTimezoneName")]
    exchange_timezone_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize, Debug, Default)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

/// `GET {base_url}/v8/finance/chart/{symbol}?range=1mo&interval=1d`, or
/// `period1`/`period2` Unix seconds for an explicit window.
pub struct YahooChartSource {
    client: Client,
    base_url: String,
}

impl YahooChartSource {
    pub fn new(settings: &ProviderSettings) -> Result<Self, EngineError> {
        let user_agent = header::HeaderValue::from_str(&settings.user_agent)
            .map_err(|e| EngineError::Config(format!("invalid user agent: {}", e)))?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}/{}", self.base_url, CHART_PATH, symbol)
    }
}

/// Query string for one chart request.
pub fn construct_query(request: &BarsRequest) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(4);
    match request.window {
        FetchWindow::Period(period) => {
            query.push(("range".to_string(), period.code().to_string()));
        }
        FetchWindow::Range { start, end } => {
            query.push(("period1".to_string(), start.timestamp().to_string()));
            query.push(("period2".to_string(), end.timestamp().to_string()));
        }
    }
    query.push(("interval".to_string(), request.interval.code().to_string()));
    query.push(("includePrePost".to_string(), "false".to_string()));
    query
}

/// Turns a chart payload into a sorted series. A "Not Found" chart error is an
/// unknown ticker and yields an empty series.
pub fn parse_chart_response(
    symbol: &str,
    interval: Interval,
    body: &str,
) -> Result<PriceSeries, EngineError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| EngineError::MalformedResponse(format!("chart payload for '{}': {}", symbol, e)))?;

    if let Some(err) = envelope.chart.error {
        if err.code == NOT_FOUND_CODE {
            tracing::warn!(symbol, description = %err.description, "Provider does not know this symbol");
            return Ok(PriceSeries::empty(symbol, interval));
        }
        return Err(EngineError::Api(format!("{}: {}", err.code, err.description)));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(symbol, interval));
    };

    let zone: Tz = result
        .meta
        .exchange_timezone_name
        .as_deref()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut dropped = 0usize;
    for (i, &secs) in result.timestamp.iter().enumerate() {
        let field = |col: &[Option<f64>]| col.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(&quote.open[..]),
            field(&quote.high[..]),
            field(&quote.low[..]),
            field(&quote.close[..]),
        ) else {
            dropped += 1;
            continue;
        };
        let instant = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            EngineError::MalformedResponse(format!("timestamp {} out of range for '{}'", secs, symbol))
        })?;
        bars.push(Bar {
            timestamp: Timestamp::Aware(instant.with_timezone(&zone)),
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }
    if dropped > 0 {
        tracing::debug!(symbol, dropped, "Dropped bars with missing prices");
    }

    let mut series = PriceSeries::new(symbol, interval, bars);
    series.sort_and_dedup();
    Ok(series)
}

/// Maps one HTTP exchange to a series. A failed status is only trusted when
/// the body carries a chart error (an unknown symbol comes back as a 404 with
/// a "Not Found" error); anything else is a provider failure.
pub fn interpret_response(
    symbol: &str,
    interval: Interval,
    status: StatusCode,
    body: &str,
) -> Result<PriceSeries, EngineError> {
    if !status.is_success() {
        let has_chart_error = serde_json::from_str::<ChartEnvelope>(body)
            .map(|envelope| envelope.chart.error.is_some())
            .unwrap_or(false);
        if !has_chart_error {
            return Err(EngineError::Api(format!("HTTP {} for '{}': {}", status, symbol, body.trim())));
        }
    }
    parse_chart_response(symbol, interval, body)
}

#[async_trait]
impl MarketDataSource for YahooChartSource {
    async fn fetch(&self, request: &BarsRequest) -> Result<PriceSeries, EngineError> {
        let query = construct_query(request);
        tracing::debug!(symbol = %request.symbol, ?query, "Requesting chart");

        let response = self
            .client
            .get(self.chart_url(&request.symbol))
            .query(&query)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let series = interpret_response(&request.symbol, request.interval, status, &body)?;
        tracing::info!(
            symbol = %request.symbol,
            interval = %request.interval,
            rows = series.len(),
            "Fetched chart"
        );
        Ok(series)
    }
}
