//! CSV writer error types

use thiserror::Error;

/// Result type for CSV output
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while persisting a template
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The compiler core treats writer failures as opaque
impl From<CsvError> for csvpp_core::Error {
    fn from(err: CsvError) -> Self {
        csvpp_core::Error::Writer(err.to_string())
    }
}
