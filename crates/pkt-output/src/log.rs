//! Recipient log CSV.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use pkt_model::LogEntry;

use crate::error::{OutputError, Result};

/// Column headers of the recipient log.
pub const LOG_HEADERS: [&str; 5] = [
    "Recipient Name",
    "Template Name",
    "Output Filename",
    "Sent Date",
    "Method",
];

/// Timestamp format of the "Sent Date" column (UTC, ISO 8601).
pub const SENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Writes `entries` as RFC 4180 CSV to `sink`.
pub fn write_log_csv<W: Write>(sink: W, entries: &[LogEntry]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(LOG_HEADERS)?;
    for entry in entries {
        let sent = entry.sent_at.format(SENT_DATE_FORMAT).to_string();
        writer.write_record([
            entry.recipient_name.as_str(),
            entry.template_name.as_str(),
            entry.output_filename.as_str(),
            sent.as_str(),
            entry.method.label(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the recipient log to `path`, replacing any existing file.
pub fn write_log_csv_to_path(path: &Path, entries: &[LogEntry]) -> Result<()> {
    let file = File::create(path).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_log_csv(file, entries).map_err(|e| OutputError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "wrote recipient log");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pkt_model::DeliveryMethod;

    #[test]
    fn test_log_csv_quoting() {
        let entries = vec![LogEntry {
            recipient_name: "Lee, Ann".to_string(),
            template_name: "Field \"Trip\"".to_string(),
            output_filename: "Ann Lee-1a2b3c4d/Packet.pdf".to_string(),
            sent_at: Utc.with_ymd_and_hms(2025, 5, 14, 9, 30, 0).unwrap(),
            method: DeliveryMethod::Export,
        }];
        let mut out = Vec::new();
        write_log_csv(&mut out, &entries).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Recipient Name,Template Name,Output Filename,Sent Date,Method\n\
             \"Lee, Ann\",\"Field \"\"Trip\"\"\",Ann Lee-1a2b3c4d/Packet.pdf,2025-05-14T09:30:00Z,Export\n"
        );
    }

    #[test]
    fn test_empty_log_has_header() {
        let mut out = Vec::new();
        write_log_csv(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Recipient Name,Template Name,Output Filename,Sent Date,Method\n"
        );
    }
}
