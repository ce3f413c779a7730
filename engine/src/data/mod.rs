// Market data acquisition and time normalization
pub mod csv_parser;
pub mod source;
pub mod timezone;
pub mod yahoo;

pub use csv_parser::CsvSource;
pub use source::{BarsRequest, FetchWindow, MarketDataSource};
pub use timezone::TimeNormalizer;
pub use yahoo::YahooChartSource;
