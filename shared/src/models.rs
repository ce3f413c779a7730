use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Canonical label of the timestamp column once a series has been normalized.
pub const DATETIME_COLUMN: &str = "Datetime";

/// Column labels of the price table, in display order.
pub const PRICE_COLUMNS: [&str; 6] = [DATETIME_COLUMN, "Open", "High", "Low", "Close", "Volume"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown period '{0}' (expected one of 1d, 1wk, 1mo, 1y, max)")]
    Period(String),
    #[error("unknown indicator '{0}' (expected sma or ema)")]
    Indicator(String),
    #[error("unknown chart style '{0}' (expected candlestick or line)")]
    ChartStyle(String),
}

/// A bar timestamp as delivered by a data source.
///
/// Sources that know the exchange zone hand out `Aware` values; flat files
/// without offsets hand out `Naive` ones, which are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Aware(DateTime<Tz>),
}

impl Timestamp {
    /// The instant this timestamp denotes, reading naive values as UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Timestamp::Naive(naive) => Utc.from_utc_datetime(naive),
            Timestamp::Aware(dt) => dt.with_timezone(&Utc),
        }
    }

    pub fn is_aware(&self) -> bool {
        matches!(self, Timestamp::Aware(_))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Aware(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

// Serialized as a bare ISO 8601 string; aware values carry their offset.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamp::Naive(naive) => {
                serializer.collect_str(&naive.format("%Y-%m-%dT%H:%M:%S"))
            }
            Timestamp::Aware(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        }
    }
}

/// One OHLCV row. Serializes with the price table's column labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bar {
    #[serde(rename = "Datetime")]
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Spacing between bars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute1,
    Minute30,
    Day1,
    Week1,
}

impl Interval {
    /// Provider-facing code, e.g. `30m`.
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute30 => "30m",
            Interval::Day1 => "1d",
            Interval::Week1 => "1wk",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Total span of history requested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PeriodSpec {
    Day1,
    Week1,
    Month1,
    Year1,
    Max,
}

impl PeriodSpec {
    pub const ALL: [PeriodSpec; 5] = [
        PeriodSpec::Day1,
        PeriodSpec::Week1,
        PeriodSpec::Month1,
        PeriodSpec::Year1,
        PeriodSpec::Max,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PeriodSpec::Day1 => "1d",
            PeriodSpec::Week1 => "1wk",
            PeriodSpec::Month1 => "1mo",
            PeriodSpec::Year1 => "1y",
            PeriodSpec::Max => "max",
        }
    }

    /// Sampling interval used for this period.
    pub fn interval(&self) -> Interval {
        match self {
            PeriodSpec::Day1 => Interval::Minute1,
            PeriodSpec::Week1 => Interval::Minute30,
            PeriodSpec::Month1 => Interval::Day1,
            PeriodSpec::Year1 => Interval::Week1,
            PeriodSpec::Max => Interval::Week1,
        }
    }

    /// Approximate calendar span, `None` for `Max`.
    pub fn span(&self) -> Option<chrono::Duration> {
        match self {
            PeriodSpec::Day1 => Some(chrono::Duration::days(1)),
            PeriodSpec::Week1 => Some(chrono::Duration::days(7)),
            PeriodSpec::Month1 => Some(chrono::Duration::days(31)),
            PeriodSpec::Year1 => Some(chrono::Duration::days(365)),
            PeriodSpec::Max => None,
        }
    }
}

impl fmt::Display for PeriodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PeriodSpec {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(PeriodSpec::Day1),
            "1wk" => Ok(PeriodSpec::Week1),
            "1mo" => Ok(PeriodSpec::Month1),
            "1y" => Ok(PeriodSpec::Year1),
            "max" => Ok(PeriodSpec::Max),
            other => Err(ParseError::Period(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma,
    Ema,
}

impl IndicatorKind {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "SMA",
            IndicatorKind::Ema => "EMA",
        }
    }
}

impl FromStr for IndicatorKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sma" => Ok(IndicatorKind::Sma),
            "ema" => Ok(IndicatorKind::Ema),
            other => Err(ParseError::Indicator(other.to_string())),
        }
    }
}

/// Identifies a derived column: which average, over how many bars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IndicatorDescriptor {
    pub kind: IndicatorKind,
    pub window: usize,
}

impl IndicatorDescriptor {
    pub fn new(kind: IndicatorKind, window: usize) -> Self {
        Self { kind, window }
    }

    /// Display label, e.g. `SMA 20`.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind.abbreviation(), self.window)
    }
}

impl fmt::Display for IndicatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.abbreviation(), self.window)
    }
}

/// Values aligned 1:1 with the bars of the owning series; `None` marks a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorColumn {
    pub descriptor: IndicatorDescriptor,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: Interval,
    pub bars: Vec<Bar>,
    pub indicators: Vec<IndicatorColumn>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, interval: Interval, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars,
            indicators: Vec::new(),
        }
    }

    pub fn empty(symbol: impl Into<String>, interval: Interval) -> Self {
        Self::new(symbol, interval, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Orders bars by instant and drops repeated timestamps, keeping the first.
    pub fn sort_and_dedup(&mut self) {
        self.bars.sort_by_key(|b| b.timestamp.to_utc());
        self.bars.dedup_by_key(|b| b.timestamp.to_utc());
    }

    pub fn indicator(&self, descriptor: &IndicatorDescriptor) -> Option<&IndicatorColumn> {
        self.indicators.iter().find(|c| c.descriptor == *descriptor)
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

/// Scalars reduced from one fetched window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub last_close: f64,
    /// Close of the first bar in the window; `change` is measured against it.
    pub reference_close: f64,
    pub change: f64,
    pub percent_change: f64,
    pub high: f64,
    pub low: f64,
    pub total_volume: u64,
}

/// One entry of the watchlist strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    pub symbol: String,
    pub last_price: f64,
    pub change: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ChartStyle {
    #[default]
    Candlestick,
    Line,
}

impl FromStr for ChartStyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "candlestick" | "candle" => Ok(ChartStyle::Candlestick),
            "line" => Ok(ChartStyle::Line),
            other => Err(ParseError::ChartStyle(other.to_string())),
        }
    }
}
