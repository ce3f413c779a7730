// Technical indicators module
pub mod ema;
pub mod sma;

pub use ema::Ema;
pub use sma::Sma;

use shared::models::{Bar, IndicatorColumn, IndicatorDescriptor, IndicatorKind, PriceSeries};

use crate::error::EngineError;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn descriptor(&self) -> IndicatorDescriptor;

    fn name(&self) -> String {
        self.descriptor().label()
    }

    // One value per bar; None where the window is not yet full
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>>;
}

pub fn calculator_for(descriptor: IndicatorDescriptor) -> Result<Box<dyn IndicatorCalculator>, EngineError> {
    Ok(match descriptor.kind {
        IndicatorKind::Sma => Box::new(Sma::new(descriptor.window)?),
        IndicatorKind::Ema => Box::new(Ema::new(descriptor.window)?),
    })
}

/// Appends `SMA {window}` and `EMA {window}` columns computed over the closes.
pub fn add_indicators(mut series: PriceSeries, window: usize) -> Result<PriceSeries, EngineError> {
    for kind in [IndicatorKind::Sma, IndicatorKind::Ema] {
        let calculator = calculator_for(IndicatorDescriptor::new(kind, window))?;
        let values = calculator.calculate(&series.bars);
        tracing::debug!(
            symbol = %series.symbol,
            indicator = %calculator.name(),
            defined = values.iter().filter(|v| v.is_some()).count(),
            "Calculated indicator"
        );
        series.indicators.retain(|c| c.descriptor != calculator.descriptor());
        series.indicators.push(IndicatorColumn {
            descriptor: calculator.descriptor(),
            values,
        });
    }
    Ok(series)
}

pub(crate) fn validate_window(window: usize) -> Result<(), EngineError> {
    if window == 0 {
        return Err(EngineError::InvalidWindow {
            window,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
