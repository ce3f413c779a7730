use serde::{Deserialize, Serialize};
use shared::models::{ChartStyle, IndicatorDescriptor, IndicatorKind, PeriodSpec};

use crate::config::settings::DashboardSettings;
use crate::error::EngineError;

/// Everything one refresh needs, captured up front so the pipeline never
/// reaches into presenter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub ticker: String,
    pub period: PeriodSpec,
    pub window: usize,
    /// Indicator lines to overlay on the chart, in selection order.
    pub overlays: Vec<IndicatorKind>,
    pub chart_style: ChartStyle,
}

impl DashboardRequest {
    pub fn new(ticker: impl Into<String>, period: PeriodSpec, window: usize) -> Self {
        Self {
            ticker: ticker.into(),
            period,
            window,
            overlays: Vec::new(),
            chart_style: ChartStyle::default(),
        }
    }

    pub fn with_overlays(mut self, overlays: impl IntoIterator<Item = IndicatorKind>) -> Self {
        self.overlays = overlays.into_iter().collect();
        self
    }

    pub fn with_chart_style(mut self, chart_style: ChartStyle) -> Self {
        self.chart_style = chart_style;
        self
    }

    pub fn from_settings(settings: &DashboardSettings) -> Self {
        Self::new(settings.default_ticker.clone(), PeriodSpec::Day1, settings.default_window)
    }

    /// Returns a copy with the ticker trimmed and upper-cased, after checking
    /// the window against the configured bounds.
    pub fn validate(&self, settings: &DashboardSettings) -> Result<Self, EngineError> {
        let ticker = self.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(EngineError::InvalidRequest("ticker must not be empty".to_string()));
        }
        if self.window == 0 || self.window > settings.max_window {
            return Err(EngineError::InvalidWindow {
                window: self.window,
                reason: format!("must be between 1 and {}", settings.max_window),
            });
        }
        Ok(Self { ticker, ..self.clone() })
    }

    /// Selected overlays as descriptors for this request's window, duplicates removed.
    pub fn overlay_descriptors(&self) -> Vec<IndicatorDescriptor> {
        let mut out: Vec<IndicatorDescriptor> = Vec::with_capacity(self.overlays.len());
        for kind in &self.overlays {
            let descriptor = IndicatorDescriptor::new(*kind, self.window);
            if !out.contains(&descriptor) {
                out.push(descriptor);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_normalizes_ticker() {
        let settings = DashboardSettings::default();
        let request = DashboardRequest::new("  nvda ", PeriodSpec::Month1, 20);
        assert_eq!(request.validate(&settings).unwrap().ticker, "NVDA");
    }

    #[test]
    fn test_validate_rejects_blank_ticker() {
        let settings = DashboardSettings::default();
        let request = DashboardRequest::new("   ", PeriodSpec::Day1, 20);
        assert!(matches!(request.validate(&settings), Err(EngineError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_window_bounds() {
        let settings = DashboardSettings::default();
        assert!(DashboardRequest::new("AAPL", PeriodSpec::Day1, 1).validate(&settings).is_ok());
        assert!(DashboardRequest::new("AAPL", PeriodSpec::Day1, 364).validate(&settings).is_ok());
        for window in [0, 365] {
            let result = DashboardRequest::new("AAPL", PeriodSpec::Day1, window).validate(&settings);
            assert!(matches!(result, Err(EngineError::InvalidWindow { .. })), "window {} accepted", window);
        }
    }

    #[test]
    fn test_overlay_descriptors_dedup_in_order() {
        let request = DashboardRequest::new("AAPL", PeriodSpec::Day1, 9).with_overlays([
            IndicatorKind::Ema,
            IndicatorKind::Sma,
            IndicatorKind::Ema,
        ]);
        let labels: Vec<String> = request.overlay_descriptors().iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["EMA 9", "SMA 9"]);
    }

    #[test]
    fn test_from_settings_uses_configured_defaults() {
        let mut settings = DashboardSettings::default();
        settings.default_ticker = "msft".to_string();
        settings.default_window = 50;

        let request = DashboardRequest::from_settings(&settings);
        assert_eq!(request.period, PeriodSpec::Day1);
        assert_eq!(request.window, 50);
        assert!(request.overlays.is_empty());
        assert_eq!(request.chart_style, ChartStyle::Candlestick);
        assert_eq!(request.validate(&settings).unwrap().ticker, "MSFT");
    }
}
