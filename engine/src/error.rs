use shared::models::UnknownGranularity;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown granularity: {0}")]
    UnknownGranularity(#[from] UnknownGranularity),

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("HTTP error: {source}")]
    HttpError {
        #[from]
        source: reqwest::Error,
    },

    #[error("Feed '{address}' answered with status {status}")]
    HttpStatus { status: u16, address: String },

    // The feed text could not be split into header and rows of equal shape.
    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),
}

impl EngineError {
    /// Whether the feed could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EngineError::IoError { .. } | EngineError::HttpError { .. } | EngineError::HttpStatus { .. }
        )
    }

    /// Short text shown on the chart surface in place of the candles.
    pub fn user_message(&self) -> String {
        match self {
            EngineError::ConfigError(msg) => msg.clone(),
            EngineError::UnknownGranularity(UnknownGranularity(key)) => {
                format!("No data feed configured for '{}'", key)
            }
            EngineError::IoError { .. } | EngineError::HttpError { .. } | EngineError::HttpStatus { .. } => {
                "Failed to load CSV".to_string()
            }
            EngineError::CsvSystemError { .. } | EngineError::CsvDataFormatError(_) => "CSV Parse Error".to_string(),
        }
    }
}
