//! Persistence error types.
//!
//! All persistence operations return structured errors that provide
//! user-friendly messages and optional remediation hints.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a state file.
    #[error("Invalid state file format")]
    InvalidFormat { path: PathBuf, reason: String },

    /// State written by a newer build.
    #[error("State file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Serialization error.
    #[error("Failed to serialize app state")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Deserialization error.
    #[error("Failed to deserialize app state")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The file at {} is not a valid state file: {}",
                    path.display(),
                    reason
                )
            }
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => {
                format!(
                    "This state file was written by a newer version of Packet Studio \
                    (file version {found}, your version supports up to {max_supported}). \
                    Please update the application."
                )
            }
            Self::Serialization { .. } => "An error occurred while saving your data.".to_string(),
            Self::Deserialization { .. } => {
                "An error occurred while reading your saved data. The file may be corrupted."
                    .to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the file to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that the file exists and you have permission to read it.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Move the file aside to start with a fresh state.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Install the latest version.".into()),
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => Some("Try restoring a backup if you have one.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Free up disk space or try saving to a different location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message() {
        let err = PersistenceError::UnsupportedVersion {
            found: 9,
            max_supported: 1,
            path: PathBuf::from("state.json"),
        };
        assert_eq!(
            err.to_string(),
            "State file version 9 is not supported (maximum: 1)"
        );
        assert!(err.user_message().contains("file version 9"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_read_suggestion() {
        let err = PersistenceError::Io {
            operation: "read",
            path: PathBuf::from("state.json"),
            source: std::io::Error::other("boom"),
        };
        assert_eq!(
            err.suggestion().as_deref(),
            Some("Check that the file exists and you have permission to read it.")
        );
    }
}
