// Reduces a fetched window to the headline metrics.
use shared::models::{PriceSeries, SummaryMetrics, TickerQuote};

use crate::error::EngineError;

/// `change` is measured against the first close of the window, not against a
/// previous session.
pub fn summarize(series: &PriceSeries) -> Result<SummaryMetrics, EngineError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(EngineError::EmptySeries { symbol: series.symbol.clone() });
    };

    let reference_close = first.close;
    if reference_close == 0.0 {
        return Err(EngineError::ZeroReferencePrice { symbol: series.symbol.clone() });
    }

    let last_close = last.close;
    let change = last_close - reference_close;
    let percent_change = 100.0 * change / reference_close;

    let high = series.bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = series.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let total_volume = series.bars.iter().map(|b| b.volume).sum();

    Ok(SummaryMetrics {
        last_close,
        reference_close,
        change,
        percent_change,
        high,
        low,
        total_volume,
    })
}

/// Watchlist entry: last close against the window's first open.
pub fn quote(series: &PriceSeries) -> Result<TickerQuote, EngineError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(EngineError::EmptySeries { symbol: series.symbol.clone() });
    };
    if first.open == 0.0 {
        return Err(EngineError::ZeroReferencePrice { symbol: series.symbol.clone() });
    }
    let change = last.close - first.open;
    Ok(TickerQuote {
        symbol: series.symbol.clone(),
        last_price: last.close,
        change,
        percent_change: 100.0 * change / first.open,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;
    use shared::models::Interval;

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        PriceSeries::new("TEST", Interval::Day1, bars_from_closes(closes))
    }

    #[test]
    fn test_summary_scenario() {
        let mut series = series_from_closes(&[100.0, 101.0, 99.0, 105.0]);
        series.bars[2].low = 98.5;
        series.bars[3].high = 106.0;

        let metrics = summarize(&series).unwrap();
        assert_eq!(metrics.last_close, 105.0);
        assert_eq!(metrics.reference_close, 100.0);
        assert_eq!(metrics.change, 5.0);
        assert_eq!(metrics.percent_change, 5.0);
        assert_eq!(metrics.high, 106.0);
        assert_eq!(metrics.low, 98.5);
        assert_eq!(metrics.total_volume, 400);
    }

    #[test]
    fn test_flat_series_has_no_change() {
        let metrics = summarize(&series_from_closes(&[42.0; 6])).unwrap();
        assert_eq!(metrics.change, 0.0);
        assert_eq!(metrics.percent_change, 0.0);
    }

    #[test]
    fn test_single_row() {
        let metrics = summarize(&series_from_closes(&[10.0])).unwrap();
        assert_eq!(metrics.change, 0.0);
        assert_eq!(metrics.high, 10.0);
        assert_eq!(metrics.low, 10.0);
    }

    #[test]
    fn test_empty_series_is_error() {
        let series = PriceSeries::empty("NONE", Interval::Day1);
        assert!(matches!(summarize(&series), Err(EngineError::EmptySeries { .. })));
    }

    #[test]
    fn test_zero_reference_is_error() {
        let series = series_from_closes(&[0.0, 1.0]);
        assert!(matches!(summarize(&series), Err(EngineError::ZeroReferencePrice { .. })));
    }

    #[test]
    fn test_quote_uses_first_open() {
        let mut series = series_from_closes(&[100.0, 102.0, 110.0]);
        series.bars[0].open = 88.0;
        let q = quote(&series).unwrap();
        assert_eq!(q.last_price, 110.0);
        assert_eq!(q.change, 22.0);
        assert_eq!(q.percent_change, 25.0);
    }
}
