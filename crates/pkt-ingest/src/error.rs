//! Error types for recipient ingestion.
//!
//! Parsing itself never fails: malformed rows are skipped. Errors only
//! arise when loading a CSV file from disk.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a CSV file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("CSV file {path} is {size} bytes, limit is {max_size}")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    /// File is not valid UTF-8.
    #[error("CSV file {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/file.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /path/to/file.csv");
    }

    #[test]
    fn test_encoding_display() {
        let err = IngestError::UnsupportedEncoding {
            path: PathBuf::from("roster.csv"),
            encoding: "UTF-16 LE",
        };
        assert_eq!(err.to_string(), "unsupported encoding UTF-16 LE in roster.csv");
    }
}
