//! Output generation for Packet Studio.
//!
//! - [`zip`]: dependency-free stored ZIP writer
//! - [`bundle`]: per-recipient export folders and `Summary.csv`
//! - [`log`]: recipient log CSV
//! - [`engine`]: the [`PdfEngine`] port filled forms go through

pub mod bundle;
pub mod crc32;
pub mod engine;
pub mod error;
pub mod log;
pub mod sanitize;
pub mod zip;

pub use bundle::{
    ExportRequest, ExportSummary, ExportedRecipient, MESSAGE_FILE, PACKET_FILE, SUMMARY_FILE,
    bundle_dir_name, export_bundle, recipient_folder_name,
};
pub use crc32::{Crc32, crc32};
pub use engine::PdfEngine;
pub use error::{OutputError, Result};
pub use log::{LOG_HEADERS, write_log_csv, write_log_csv_to_path};
pub use sanitize::{MAX_NAME_LEN, sanitize_filename};
pub use zip::{SourceEntry, ZipWriter, collect_entries, write_zip, write_zip_to_path};
