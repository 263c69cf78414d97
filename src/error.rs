use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    /// The caller's cancellation signal fired while a scan was in flight.
    /// This is the only failure a scan propagates; tool failures are
    /// recovered into empty results.
    #[error("Scan cancelled by caller")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Reporting error: {0}")]
    Reporting(String),

    #[error("System error: {0}")]
    SystemError(String),
}
