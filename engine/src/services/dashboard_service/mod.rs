// engine/src/services/dashboard_service/mod.rs
// DashboardService owns a data source and the settings for one session;
// each public method dispatches to a handler in a sibling module.

use shared::models::TickerQuote;

use crate::config::settings::DashboardSettings;
use crate::data::source::MarketDataSource;
use crate::data::timezone::TimeNormalizer;
use crate::error::EngineError;
use crate::models::{DashboardRequest, RefreshOutcome};

pub mod refresh;
pub mod summarize;
pub mod watchlist;

pub use summarize::{quote, summarize};

pub struct DashboardService<S> {
    source: S,
    settings: DashboardSettings,
    normalizer: TimeNormalizer,
}

impl<S: MarketDataSource> DashboardService<S> {
    pub fn new(source: S, settings: DashboardSettings) -> Result<Self, EngineError> {
        let normalizer = TimeNormalizer::new(settings.display_zone()?);
        Ok(DashboardService {
            source,
            settings,
            normalizer,
        })
    }

    /// One pull: fetch, normalize, add indicators, summarize.
    pub async fn refresh(&self, request: &DashboardRequest) -> Result<RefreshOutcome, EngineError> {
        tracing::info!(
            ticker = %request.ticker,
            period = %request.period,
            window = request.window,
            "Refreshing dashboard"
        );
        refresh::handle_refresh(&self.source, &self.normalizer, &self.settings, request).await
    }

    /// Quotes for the configured watchlist, fetched one after another.
    pub async fn watchlist(&self) -> Result<Vec<TickerQuote>, EngineError> {
        tracing::info!(symbols = self.settings.watchlist.len(), "Refreshing watchlist");
        watchlist::handle_watchlist(&self.source, &self.normalizer, &self.settings.watchlist).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::{BarsRequest, FetchWindow};
    use crate::indicators::test_support::bars_from_closes;
    use async_trait::async_trait;
    use chrono::Duration;
    use shared::models::{IndicatorKind, Interval, PeriodSpec, PriceSeries, Timestamp};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StaticSource {
        series: HashMap<String, Vec<f64>>,
        requests: Mutex<Vec<BarsRequest>>,
    }

    impl StaticSource {
        fn with(mut self, symbol: &str, closes: &[f64]) -> Self {
            self.series.insert(symbol.to_string(), closes.to_vec());
            self
        }

        fn requests(&self) -> Vec<BarsRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketDataSource for StaticSource {
        async fn fetch(&self, request: &BarsRequest) -> Result<PriceSeries, EngineError> {
            self.requests.lock().unwrap().push(request.clone());
            let bars = self
                .series
                .get(&request.symbol)
                .map(|closes| bars_from_closes(closes))
                .unwrap_or_default();
            Ok(PriceSeries::new(&request.symbol, request.interval, bars))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl MarketDataSource for FailingSource {
        async fn fetch(&self, _request: &BarsRequest) -> Result<PriceSeries, EngineError> {
            Err(EngineError::Api("HTTP 503 Service Unavailable".to_string()))
        }
    }

    fn service<S: MarketDataSource>(source: S) -> DashboardService<S> {
        DashboardService::new(source, DashboardSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_produces_snapshot() {
        let svc = service(StaticSource::default().with("NVDA", &[100.0, 101.0, 99.0, 105.0]));
        let request = DashboardRequest::new("nvda", PeriodSpec::Month1, 2).with_overlays([IndicatorKind::Sma]);

        let outcome = svc.refresh(&request).await.unwrap();
        let snapshot = outcome.snapshot().expect("expected data");

        assert_eq!(snapshot.ticker, "NVDA");
        assert_eq!(snapshot.interval, Interval::Day1);
        assert_eq!(snapshot.metrics.last_close, 105.0);
        assert_eq!(snapshot.metrics.change, 5.0);
        assert_eq!(snapshot.metrics.percent_change, 5.0);
        assert_eq!(snapshot.series.indicators.len(), 2);

        let overlays = snapshot.overlays();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].descriptor.label(), "SMA 2");
        assert_eq!(overlays[0].values, vec![None, Some(100.5), Some(100.0), Some(102.0)]);

        for bar in &snapshot.series.bars {
            match bar.timestamp {
                Timestamp::Aware(dt) => assert_eq!(dt.timezone(), chrono_tz::America::Costa_Rica),
                other => panic!("expected normalized timestamp, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_refresh_unknown_ticker_is_empty() {
        let svc = service(StaticSource::default());
        let request = DashboardRequest::new("ZZZZINVALID", PeriodSpec::Day1, 20);
        let outcome = svc.refresh(&request).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Empty { ticker: "ZZZZINVALID".to_string() });
        assert!(outcome.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_refresh_week_requests_explicit_range() {
        let source = StaticSource::default().with("AAPL", &[1.0, 2.0, 3.0]);
        let svc = service(source);
        svc.refresh(&DashboardRequest::new("AAPL", PeriodSpec::Week1, 2)).await.unwrap();

        let requests = svc.source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].interval, Interval::Minute30);
        match requests[0].window {
            FetchWindow::Range { start, end } => assert_eq!(end - start, Duration::days(7)),
            other => panic!("expected explicit range, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_window_fails_before_fetch() {
        let svc = service(StaticSource::default().with("AAPL", &[1.0]));
        let result = svc.refresh(&DashboardRequest::new("AAPL", PeriodSpec::Day1, 365)).await;
        assert!(matches!(result, Err(EngineError::InvalidWindow { window: 365, .. })));
        assert!(svc.source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_fails_refresh() {
        let svc = service(FailingSource);
        let result = svc.refresh(&DashboardRequest::new("AAPL", PeriodSpec::Day1, 20)).await;
        assert!(matches!(result, Err(EngineError::Api(_))));
    }

    #[tokio::test]
    async fn test_watchlist_skips_symbols_without_data() {
        let source = StaticSource::default()
            .with("AAPL", &[200.0, 201.0, 202.0])
            .with("MSFT", &[400.0, 396.0])
            .with("NVDA", &[0.0, 1.0]);
        let svc = service(source);

        let quotes = svc.watchlist().await.unwrap();
        let symbols: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(quotes[0].change, 2.0);
        assert_eq!(quotes[1].percent_change, -1.0);

        let requests = svc.source.requests();
        let fetched: Vec<&str> = requests.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(fetched, vec!["AAPL", "AMZN", "GOOGL", "MSFT", "NVDA"]);
        assert!(requests.iter().all(|r| r.interval == Interval::Minute1
            && r.window == FetchWindow::Period(PeriodSpec::Day1)));
    }

    #[tokio::test]
    async fn test_watchlist_propagates_fetch_errors() {
        let svc = service(FailingSource);
        assert!(svc.watchlist().await.is_err());
    }
}
