// Exponential Moving Average (EMA) indicator implementation
use super::{validate_window, IndicatorCalculator};
use crate::error::EngineError;
use shared::models::{Bar, IndicatorDescriptor, IndicatorKind};

/// Recursive smoothing with alpha = 2 / (period + 1), seeded at the first close.
/// The first `period - 1` values are masked so the column lines up with SMA.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_window(period)?;
        Ok(Self { period })
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }
}

impl IndicatorCalculator for Ema {
    fn descriptor(&self) -> IndicatorDescriptor {
        IndicatorDescriptor::new(IndicatorKind::Ema, self.period)
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        let alpha = self.alpha();
        let mut results = Vec::with_capacity(data.len());
        let mut previous_ema: Option<f64> = None;

        for (i, bar) in data.iter().enumerate() {
            let ema = match previous_ema {
                None => bar.close,
                Some(prev) => alpha * bar.close + (1.0 - alpha) * prev,
            };
            previous_ema = Some(ema);
            results.push(if i + 1 >= self.period { Some(ema) } else { None });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::bars_from_closes;

    #[test]
    fn test_ema_calculation() {
        let ema = Ema::new(3).unwrap(); // alpha = 0.5
        let results = ema.calculate(&bars_from_closes(&[10.0, 11.0, 12.0, 13.0, 14.0]));
        // y0 = 10, y1 = 10.5, y2 = 11.25, y3 = 12.125, y4 = 13.0625
        assert_eq!(results, vec![None, None, Some(11.25), Some(12.125), Some(13.0625)]);
    }

    #[test]
    fn test_ema_period_one_tracks_close() {
        let ema = Ema::new(1).unwrap();
        let results = ema.calculate(&bars_from_closes(&[3.0, 7.0, 5.0]));
        assert_eq!(results, vec![Some(3.0), Some(7.0), Some(5.0)]);
    }

    #[test]
    fn test_ema_constant_series_is_constant() {
        let ema = Ema::new(5).unwrap();
        let results = ema.calculate(&bars_from_closes(&[42.0; 8]));
        assert_eq!(results[..4], [None, None, None, None]);
        assert!(results[4..].iter().all(|v| (v.unwrap() - 42.0).abs() < 1e-9));
    }

    #[test]
    fn test_ema_insufficient_data() {
        let ema = Ema::new(10).unwrap();
        let results = ema.calculate(&bars_from_closes(&[1.0, 2.0, 3.0]));
        assert_eq!(results, vec![None; 3]);
    }

    #[test]
    fn test_ema_alpha() {
        assert_eq!(Ema::new(19).unwrap().alpha(), 0.1);
    }
}
