//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer outside the storage module:
/// export file I/O, CSV parsing, and input validation failures.
#[derive(Debug)]
pub enum LinkMatchError {
    /// Reading the export file failed.
    Io(std::io::Error),
    /// The export could not be parsed as CSV.
    Csv(csv::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for LinkMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Csv(e) => write!(f, "CSV error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for LinkMatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LinkMatchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for LinkMatchError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}
