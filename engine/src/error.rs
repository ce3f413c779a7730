use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid indicator window {window}: {reason}")]
    InvalidWindow { window: usize, reason: String },

    #[error("Market data provider unreachable: {source}")]
    Provider {
        #[from]
        source: reqwest::Error,
    },

    #[error("Market data provider error: {0}")]
    Api(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("No price data for '{symbol}'")]
    EmptySeries { symbol: String },

    #[error("Reference price for '{symbol}' is zero; percent change is undefined")]
    ZeroReferencePrice { symbol: String },
}
