//! Error types for output generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from archive, bundle and log writing.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Could not create an output directory or file.
    #[error("failed to create {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write output.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read a source file or directory.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination cannot be used.
    #[error("invalid destination {}: {reason}", path.display())]
    InvalidDestination { path: PathBuf, reason: &'static str },

    /// The source is not a readable directory.
    #[error("not a directory: {}", path.display())]
    InvalidSource { path: PathBuf },

    /// An entry does not fit the classic ZIP format.
    #[error("{name} is too large for a ZIP archive ({size} bytes)")]
    EntryTooLarge { name: String, size: u64 },

    /// The archive would exceed the classic ZIP limits.
    #[error("archive exceeds ZIP limits: {reason}")]
    ArchiveTooLarge { reason: &'static str },

    /// Failed to write CSV output.
    #[error("failed to write CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The PDF engine failed for a recipient.
    #[error("PDF engine failed for {recipient}: {message}")]
    Engine { recipient: String, message: String },
}

impl OutputError {
    /// User-facing message without internal detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::CreateDirectory { path, .. } => {
                format!("Could not create {}. Check folder permissions.", path.display())
            }
            Self::Write { path, .. } | Self::Csv { path, .. } => {
                format!("Could not write {}. Check free disk space.", path.display())
            }
            Self::Read { path, .. } => format!("Could not read {}.", path.display()),
            Self::InvalidDestination { reason, .. } => format!("Choose another location: {reason}."),
            Self::InvalidSource { path } => format!("{} is not a folder.", path.display()),
            Self::EntryTooLarge { name, .. } => format!("{name} is too large to archive."),
            Self::ArchiveTooLarge { .. } => "The export is too large to archive.".to_string(),
            Self::Engine { recipient, .. } => format!("Could not fill the PDF for {recipient}."),
        }
    }
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
