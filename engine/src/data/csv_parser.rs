// File-backed market data source reading yfinance-style OHLCV exports.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use csv::{ReaderBuilder, StringRecord};
use shared::models::{Bar, Interval, PriceSeries, Timestamp};

use crate::data::source::{BarsRequest, FetchWindow, MarketDataSource};
use crate::error::EngineError;

// Timestamp cells: RFC 3339 with an offset is aware, anything else is naive.
pub mod timestamp_format {
    use super::*;

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    pub fn parse_timestamp(s: &str) -> Result<Timestamp, String> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::Aware(dt.with_timezone(&Tz::UTC)));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(Timestamp::Aware(dt.with_timezone(&Tz::UTC)));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Timestamp::Naive(naive));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Timestamp::Naive)
            .ok_or_else(|| format!("Failed to parse timestamp '{}'", s))
    }

}

/// Reads `<data_dir>/<SYMBOL>.csv`. A missing file is an unknown symbol.
pub struct CsvSource {
    data_dir: PathBuf,
}

impl CsvSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }

    // Header: Datetime,Open,High,Low,Close,Volume  (or Date instead of Datetime)
    pub fn load_bars_from_csv(file_path: &Path) -> Result<Vec<Bar>, EngineError> {
        let file = File::open(file_path)?;
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut bars = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let ts_str = Self::get_field(&record, &headers, "Datetime")
                .or_else(|| Self::get_field(&record, &headers, "Date"))
                .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing 'Datetime'/'Date' field at line {}", line)))?;
            let timestamp = timestamp_format::parse_timestamp(ts_str)
                .map_err(|e| EngineError::CsvDataFormatError(format!("{} at line {}", e, line)))?;

            let open = Self::price_field(&record, &headers, "Open", line)?;
            let high = Self::price_field(&record, &headers, "High", line)?;
            let low = Self::price_field(&record, &headers, "Low", line)?;
            let close = Self::price_field(&record, &headers, "Close", line)?;

            let volume_str = Self::get_field(&record, &headers, "Volume")
                .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing 'Volume' field at line {}", line)))?;
            // Some exports write volume as a float ("1200.0").
            let volume = volume_str
                .parse::<u64>()
                .or_else(|_| volume_str.parse::<f64>().map(|v| v.max(0.0).round() as u64))
                .map_err(|e| EngineError::CsvDataFormatError(format!("Error parsing 'Volume' at line {}: {}", line, e)))?;

            bars.push(Bar { timestamp, open, high, low, close, volume });
        }
        Ok(bars)
    }

    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
            .filter(|value| !value.is_empty())
    }

    fn price_field(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64, EngineError> {
        let raw = Self::get_field(record, headers, name)
            .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' field at line {}", name, line)))?;
        raw.parse::<f64>()
            .map_err(|e| EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e)))
    }

    // Named periods trail the file's last bar. An explicit range that runs
    // past the last bar is slid back to end there, keeping its length.
    fn apply_window(bars: Vec<Bar>, window: FetchWindow) -> Vec<Bar> {
        let Some(last) = bars.last().map(|b| b.timestamp.to_utc()) else {
            return bars;
        };
        let bounds = match window {
            FetchWindow::Range { start, end } if end <= last => RowBounds::Between { start, end },
            FetchWindow::Range { start, end } => RowBounds::Trailing(end - start),
            FetchWindow::Period(period) => period.span().map_or(RowBounds::All, RowBounds::Trailing),
        };
        bars.into_iter()
            .filter(|b| bounds.keeps(b.timestamp.to_utc(), last))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum RowBounds {
    All,
    /// `(last - span, last]`
    Trailing(Duration),
    /// `[start, end)`
    Between { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl RowBounds {
    fn keeps(&self, at: DateTime<Utc>, last: DateTime<Utc>) -> bool {
        match *self {
            RowBounds::All => true,
            RowBounds::Trailing(span) => at > last - span,
            RowBounds::Between { start, end } => start <= at && at < end,
        }
    }
}

#[async_trait]
impl MarketDataSource for CsvSource {
    async fn fetch(&self, request: &BarsRequest) -> Result<PriceSeries, EngineError> {
        let path = self.path_for(&request.symbol);
        if !path.exists() {
            tracing::warn!(symbol = %request.symbol, path = %path.display(), "No CSV file for symbol");
            return Ok(PriceSeries::empty(&request.symbol, request.interval));
        }

        let mut series = PriceSeries::new(&request.symbol, request.interval, Self::load_bars_from_csv(&path)?);
        series.sort_and_dedup();
        series.bars = Self::apply_window(std::mem::take(&mut series.bars), request.window);
        if series.interval != Interval::Day1 {
            tracing::debug!(symbol = %request.symbol, interval = %request.interval, "CSV rows are not resampled");
        }
        tracing::info!(symbol = %request.symbol, rows = series.len(), path = %path.display(), "Loaded CSV series");
        Ok(series)
    }
}
