//! Custom error types for the Kardex viewer
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Kardex operations
#[derive(Error, Debug)]
pub enum KardexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The file could not be read as delimited text
    #[error("CSV error: {0}")]
    Csv(String),

    /// Required columns are absent from the header row
    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    /// A user-entered date could not be parsed
    #[error("Invalid date '{0}'. Use dd/mm/yyyy")]
    InvalidDate(String),

    /// Validation errors for filter selections
    #[error("Validation error: {0}")]
    Validation(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl KardexError {
    /// Check if this is an input problem the user can fix in place
    ///
    /// Input errors halt the current interaction but leave the rendered
    /// report as it was.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidDate(_) | Self::Validation(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for KardexError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KardexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for KardexError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for Kardex operations
pub type KardexResult<T> = Result<T, KardexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KardexError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_missing_column_lists_every_column() {
        let err = KardexError::MissingColumn {
            columns: vec!["LOCAL".into(), "TIPLANCTO".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required column(s): LOCAL, TIPLANCTO"
        );
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_input_errors() {
        assert!(KardexError::InvalidDate("31/02".into()).is_input_error());
        assert!(KardexError::Validation("start after end".into()).is_input_error());
        assert!(!KardexError::Csv("bad".into()).is_input_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: KardexError = io_err.into();
        assert!(matches!(err, KardexError::Io(_)));
    }
}
