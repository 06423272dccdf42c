//! Root app state type.

use chrono::{DateTime, Utc};
use pkt_model::{CsvImportSnapshot, FieldMapping, LogEntry, MessageTemplate, Recipient};
use serde::{Deserialize, Serialize};

/// Current schema version for state files.
///
/// Increment when making breaking changes to the state format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Everything the app remembers between runs.
///
/// Core crates never read or write this type; it is only the payload a
/// [`StateStore`](crate::StateStore) moves in and out of storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Schema version (for future migrations).
    pub schema_version: u32,

    /// When the state was last saved.
    pub last_saved_at: Option<DateTime<Utc>>,

    /// Recipients of the current packet.
    pub recipients: Vec<Recipient>,

    /// The CSV the recipients came from, if any.
    pub csv_import: Option<CsvImportSnapshot>,

    /// PDF field name -> mapping value.
    pub mapping: FieldMapping,

    pub message_template: MessageTemplate,

    /// Delivery history, oldest first.
    pub logs: Vec<LogEntry>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            last_saved_at: None,
            recipients: Vec::new(),
            csv_import: None,
            mapping: FieldMapping::new(),
            message_template: MessageTemplate::default(),
            logs: Vec::new(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the last saved timestamp.
    pub fn touch(&mut self) {
        self.last_saved_at = Some(Utc::now());
    }

    /// Clears the working packet: recipients, CSV import, mapping and
    /// message. The delivery log is kept.
    pub fn reset(&mut self) {
        self.recipients.clear();
        self.csv_import = None;
        self.mapping = FieldMapping::new();
        self.message_template = MessageTemplate::default();
    }

    /// Replaces the recipients and the CSV they came from. The mapping is
    /// kept; targets naming headers the new CSV lacks resolve to empty.
    pub fn replace_import(&mut self, snapshot: CsvImportSnapshot, recipients: Vec<Recipient>) {
        tracing::debug!(
            file = %snapshot.reference.filename,
            recipients = recipients.len(),
            "replacing CSV import"
        );
        self.csv_import = Some(snapshot);
        self.recipients = recipients;
    }

    /// Appends delivery log entries.
    pub fn record(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        self.logs.extend(entries);
    }
}
