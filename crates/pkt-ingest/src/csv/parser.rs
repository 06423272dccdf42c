//! Tolerant CSV text parsing.
//!
//! Accepts any newline convention, double-quoted fields with `""` escapes,
//! and quoted fields spanning several physical lines. Rows whose field count
//! differs from the header are dropped rather than failing the import.

use pkt_model::{CsvImportSnapshot, CsvReference};
use serde::{Deserialize, Serialize};

/// Parsed CSV: a header row plus data rows of the same width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header equal to `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, in row order.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(idx).map(String::as_str))
    }

    /// Snapshot of the headers for persistence and mapping.
    pub fn snapshot(&self, reference: CsvReference) -> CsvImportSnapshot {
        CsvImportSnapshot::new(reference, self.headers.clone())
    }
}

/// Parses CSV text into headers and rows.
///
/// Empty or header-only input yields an empty table.
pub fn parse_csv(text: &str) -> CsvTable {
    let mut records = parse_records(text).into_iter();
    let Some(headers) = records.next() else {
        return CsvTable::default();
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in records {
        if record.len() == headers.len() {
            rows.push(record);
        } else {
            skipped += 1;
        }
    }

    if rows.is_empty() && skipped == 0 {
        return CsvTable::default();
    }
    if skipped > 0 {
        tracing::debug!(
            skipped,
            expected = headers.len(),
            "skipped CSV rows with mismatched field count"
        );
    }

    CsvTable { headers, rows }
}

/// Splits CSV text into records of trimmed fields, dropping blank lines.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    field.push('\n');
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                record.push(field.trim().to_string());
                field.clear();
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut records, &mut record, &mut field, quoted);
                quoted = false;
            }
            _ => field.push(c),
        }
    }
    end_record(&mut records, &mut record, &mut field, quoted);

    records
}

fn end_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    quoted: bool,
) {
    let blank = record.is_empty() && !quoted && field.trim().is_empty();
    record.push(field.trim().to_string());
    field.clear();
    let finished = std::mem::take(record);
    if !blank {
        records.push(finished);
    }
}
