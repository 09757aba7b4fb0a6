//! Error types for budget-fx

use thiserror::Error;

/// Main error type for budget-fx
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Rate fetch error: {0}")]
    RateFetchError(String),

    #[error("Rate service returned error: {0}")]
    RateServiceError(String),

    #[error("Invalid rate for {code}: {rate}")]
    InvalidRate { code: String, rate: f64 },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed row at line {line}: expected at most {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Analytics error: {0}")]
    AnalyticsError(#[from] polars::prelude::PolarsError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging setup error: {0}")]
    LoggingError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Result type alias for budget-fx operations
pub type Result<T> = std::result::Result<T, FxError>;
