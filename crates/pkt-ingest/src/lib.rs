//! Recipient ingestion for Packet Studio.
//!
//! This crate turns CSV text with unknown headers into a [`CsvTable`] and
//! from there into [`pkt_model::Recipient`] values.
//!
//! # Features
//!
//! - **Tolerant parsing**: quoted fields, `""` escapes, embedded newlines,
//!   any newline convention; malformed rows are skipped, never fatal
//! - **Recipient construction**: header synonyms fill structured fields,
//!   the rest become custom fields
//! - **Name scoring**: picks a display-name column when no name header exists
//!
//! # Example
//!
//! ```
//! use pkt_ingest::{parse_csv, parse_recipients};
//!
//! let table = parse_csv("Name,Email\nJohn,john@example.com");
//! assert_eq!(table.headers, vec!["Name", "Email"]);
//!
//! let recipients = parse_recipients("Name,Email\nJohn Smith,john@example.com");
//! assert_eq!(recipients[0].last_name, "Smith");
//! ```

mod csv;
mod error;
mod name_score;
mod recipients;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Parsing ===
pub use csv::{
    CsvTable, MAX_CSV_FILE_SIZE, parse_csv, parse_records, read_csv_file,
    read_csv_file_with_limit,
};

// === Recipients ===
pub use recipients::{parse_recipients, recipients_from_table};

// === Name Scoring ===
pub use name_score::{pick_display_column, score_name_like};
