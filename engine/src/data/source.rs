// Provider abstraction for price series
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shared::models::{Interval, PeriodSpec, PriceSeries};

use crate::error::EngineError;

/// How far back a request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchWindow {
    /// Let the provider resolve a named range.
    Period(PeriodSpec),
    /// Explicit `[start, end)` in UTC.
    Range { start: DateTime<Utc>, end: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarsRequest {
    pub symbol: String,
    pub interval: Interval,
    pub window: FetchWindow,
}

impl BarsRequest {
    /// Builds a request using the period's own sampling interval.
    pub fn for_period(symbol: impl Into<String>, period: PeriodSpec, now: DateTime<Utc>) -> Self {
        Self::new(symbol, period, period.interval(), now)
    }

    /// The one-week period is always sent as the trailing seven calendar days
    /// ending at `now`; every other period is sent by name.
    pub fn new(
        symbol: impl Into<String>,
        period: PeriodSpec,
        interval: Interval,
        now: DateTime<Utc>,
    ) -> Self {
        let window = match period {
            PeriodSpec::Week1 => FetchWindow::Range {
                start: now - Duration::days(7),
                end: now,
            },
            other => FetchWindow::Period(other),
        };
        Self {
            symbol: symbol.into(),
            interval,
            window,
        }
    }
}

/// An unknown ticker or an empty window is an empty series, not an error.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches one series, sorted by strictly increasing timestamp.
    async fn fetch(&self, request: &BarsRequest) -> Result<PriceSeries, EngineError>;
}

#[async_trait]
impl<S: MarketDataSource + ?Sized> MarketDataSource for Box<S> {
    async fn fetch(&self, request: &BarsRequest) -> Result<PriceSeries, EngineError> {
        (**self).fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 18, 30, 0).unwrap()
    }

    #[test]
    fn week_period_becomes_explicit_seven_day_range() {
        let request = BarsRequest::for_period("NVDA", PeriodSpec::Week1, now());
        assert_eq!(request.interval, Interval::Minute30);
        match request.window {
            FetchWindow::Range { start, end } => {
                assert_eq!(end, now());
                assert_eq!(end - start, Duration::days(7));
                assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 7, 18, 30, 0).unwrap());
            }
            other => panic!("expected explicit range, got {:?}", other),
        }
    }

    #[test]
    fn other_periods_are_requested_by_name() {
        for period in [PeriodSpec::Day1, PeriodSpec::Month1, PeriodSpec::Year1, PeriodSpec::Max] {
            let request = BarsRequest::for_period("AAPL", period, now());
            assert_eq!(request.window, FetchWindow::Period(period));
            assert_eq!(request.interval, period.interval());
        }
    }

    #[test]
    fn explicit_interval_overrides_mapping() {
        let request = BarsRequest::new("AAPL", PeriodSpec::Day1, Interval::Minute30, now());
        assert_eq!(request.interval, Interval::Minute30);
        assert_eq!(request.window, FetchWindow::Period(PeriodSpec::Day1));
    }
}
