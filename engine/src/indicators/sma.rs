// Simple Moving Average (SMA) indicator implementation
use super::{validate_window, IndicatorCalculator};
use crate::error::EngineError;
use shared::models::{Bar, IndicatorDescriptor, IndicatorKind};

pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_window(period)?;
        Ok(Self { period })
    }
}

impl IndicatorCalculator for Sma {
    fn descriptor(&self) -> IndicatorDescriptor {
        IndicatorDescriptor::new(IndicatorKind::Sma, self.period)
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        if data.len() < self.period {
            return vec![None; data.len()];
        }

        let mut results = vec![None; self.period - 1]; // No SMA for initial period

        // Calculate sum for the first window
        let mut sum: f64 = data.iter().take(self.period).map(|b| b.close).sum();
        results.push(Some(sum / self.period as f64));

        // Slide the window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period].close + data[i].close;
            results.push(Some(sum / self.period as f64));
        }
        results
    }
}
