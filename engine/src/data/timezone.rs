// Moves every bar of a series into the display time zone
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use shared::models::{PriceSeries, Timestamp};

/// Naive timestamps are read as UTC before converting. Output is always
/// `Timestamp::Aware` in the display zone, so a second pass changes nothing.
#[derive(Debug, Clone, Copy)]
pub struct TimeNormalizer {
    zone: Tz,
}

impl TimeNormalizer {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn normalize_timestamp(&self, ts: Timestamp) -> Timestamp {
        match ts {
            Timestamp::Naive(naive) => {
                Timestamp::Aware(Utc.from_utc_datetime(&naive).with_timezone(&self.zone))
            }
            Timestamp::Aware(dt) => Timestamp::Aware(dt.with_timezone(&self.zone)),
        }
    }

    pub fn normalize(&self, mut series: PriceSeries) -> PriceSeries {
        let naive_rows = series.bars.iter().filter(|b| !b.timestamp.is_aware()).count();
        tracing::debug!(
            symbol = %series.symbol,
            rows = series.bars.len(),
            naive_rows,
            zone = %self.zone,
            "Normalizing series timestamps"
        );
        for bar in series.bars.iter_mut() {
            bar.timestamp = self.normalize_timestamp(bar.timestamp);
        }
        series
    }
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self::new(chrono_tz::America::Costa_Rica)
    }
}
