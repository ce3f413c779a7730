// Handler for a dashboard refresh
use chrono::Utc;

use super::summarize::summarize;
use crate::config::settings::DashboardSettings;
use crate::data::source::{BarsRequest, MarketDataSource};
use crate::data::timezone::TimeNormalizer;
use crate::error::EngineError;
use crate::indicators::add_indicators;
use crate::models::{DashboardRequest, DashboardSnapshot, RefreshOutcome};

pub async fn handle_refresh<S: MarketDataSource + ?Sized>(
    source: &S,
    normalizer: &TimeNormalizer,
    settings: &DashboardSettings,
    request: &DashboardRequest,
) -> Result<RefreshOutcome, EngineError> {
    let request = request.validate(settings)?;
    let bars_request = BarsRequest::for_period(&request.ticker, request.period, Utc::now());

    let raw = source.fetch(&bars_request).await?;
    if raw.is_empty() {
        tracing::warn!(ticker = %request.ticker, period = %request.period, "No data returned; nothing to render");
        return Ok(RefreshOutcome::Empty { ticker: request.ticker });
    }

    let series = normalizer.normalize(raw);
    let series = add_indicators(series, request.window)?;
    let metrics = summarize(&series)?;

    tracing::debug!(
        ticker = %request.ticker,
        rows = series.len(),
        last_close = metrics.last_close,
        "Refresh complete"
    );

    Ok(RefreshOutcome::Ready(DashboardSnapshot {
        selected: request.overlay_descriptors(),
        ticker: request.ticker,
        period: request.period,
        interval: bars_request.interval,
        chart_style: request.chart_style,
        series,
        metrics,
    }))
}
