//! Recipient construction from parsed CSV tables.

use std::collections::BTreeMap;

use pkt_model::{BuiltInProperty, Recipient, RecipientSource};

use crate::csv::{CsvTable, parse_csv};
use crate::name_score::pick_display_column;

/// How each CSV column feeds a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnRoles {
    properties: BTreeMap<BuiltInProperty, usize>,
    /// Column used to derive first/last name when no name column exists.
    display_column: Option<usize>,
}

impl ColumnRoles {
    fn detect(table: &CsvTable) -> Self {
        let mut properties = BTreeMap::new();
        for (idx, header) in table.headers.iter().enumerate() {
            if let Some(property) = BuiltInProperty::from_synonym(header) {
                // First matching column wins; later duplicates stay custom.
                properties.entry(property).or_insert(idx);
            }
        }

        let has_name = [
            BuiltInProperty::FirstName,
            BuiltInProperty::LastName,
            BuiltInProperty::FullName,
        ]
        .iter()
        .any(|p| properties.contains_key(p));

        let display_column = if has_name {
            None
        } else {
            pick_display_column(&table.headers, &table.rows)
        };

        Self {
            properties,
            display_column,
        }
    }

    fn is_structured(&self, idx: usize) -> bool {
        self.properties.values().any(|&col| col == idx)
    }

    fn value<'a>(&self, row: &'a [String], property: BuiltInProperty) -> Option<&'a str> {
        self.properties
            .get(&property)
            .and_then(|&idx| row.get(idx))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Parses CSV text straight into recipients.
pub fn parse_recipients(text: &str) -> Vec<Recipient> {
    recipients_from_table(&parse_csv(text))
}

/// Builds recipients from a parsed table.
///
/// Known header synonyms fill the structured fields; every other column
/// becomes a custom field under its original header. Rows without an email
/// address are dropped.
pub fn recipients_from_table(table: &CsvTable) -> Vec<Recipient> {
    let roles = ColumnRoles::detect(table);
    let mut recipients = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;

    for row in &table.rows {
        let Some(email) = roles.value(row, BuiltInProperty::Email) else {
            dropped += 1;
            continue;
        };

        let mut first = roles
            .value(row, BuiltInProperty::FirstName)
            .unwrap_or_default()
            .to_string();
        let mut last = roles
            .value(row, BuiltInProperty::LastName)
            .unwrap_or_default()
            .to_string();

        if first.is_empty() && last.is_empty() {
            let full = roles.value(row, BuiltInProperty::FullName).or_else(|| {
                roles
                    .display_column
                    .and_then(|idx| row.get(idx))
                    .map(|v| v.trim())
            });
            if let Some(full) = full {
                (first, last) = split_full_name(full);
            }
        }

        let mut recipient = Recipient::new(first, last, email, RecipientSource::Csv);
        recipient.phone_number = roles
            .value(row, BuiltInProperty::PhoneNumber)
            .map(str::to_string);

        for (idx, header) in table.headers.iter().enumerate() {
            if roles.is_structured(idx) {
                continue;
            }
            if let Some(value) = row.get(idx) {
                recipient
                    .custom_fields
                    .entry(header.clone())
                    .or_insert_with(|| value.clone());
            }
        }

        recipients.push(recipient);
    }

    if dropped > 0 {
        tracing::debug!(dropped, "dropped CSV rows without an email address");
    }
    recipients
}

/// Splits "Mary Jane Watson" into ("Mary Jane", "Watson").
fn split_full_name(full: &str) -> (String, String) {
    let full = full.trim();
    match full.rsplit_once(char::is_whitespace) {
        Some((first, last)) => (first.trim().to_string(), last.trim().to_string()),
        None => (full.to_string(), String::new()),
    }
}
