use serde::Serialize;
use shared::models::{
    ChartStyle, IndicatorColumn, IndicatorDescriptor, Interval, PeriodSpec, PriceSeries, SummaryMetrics,
};

/// Result of one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RefreshOutcome {
    /// The provider had no rows for this ticker and window; render nothing.
    Empty { ticker: String },
    Ready(DashboardSnapshot),
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            RefreshOutcome::Ready(snapshot) => Some(snapshot),
            RefreshOutcome::Empty { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub ticker: String,
    pub period: PeriodSpec,
    pub interval: Interval,
    pub chart_style: ChartStyle,
    /// Normalized bars plus the SMA/EMA columns for the requested window.
    pub series: PriceSeries,
    pub metrics: SummaryMetrics,
    pub selected: Vec<IndicatorDescriptor>,
}

impl DashboardSnapshot {
    /// Indicator columns the user chose to overlay, in selection order.
    pub fn overlays(&self) -> Vec<&IndicatorColumn> {
        self.selected
            .iter()
            .filter_map(|descriptor| self.series.indicator(descriptor))
            .collect()
    }
}
