//! Command building blocks that do not print.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pkt_ingest::{CsvTable, pick_display_column, recipients_from_table};
use pkt_map::{AutoMapConfig, AutoMapper, MappingReport, ResolveContext, build_candidates};
use pkt_model::{
    FieldHint, FieldMapping, MessageTemplate, PdfField, PdfFieldType, Recipient, normalize,
};
use pkt_template::{RenderedMessage, TokenContext, TokenGrammar, render_message, snake_token};
use serde::Serialize;

use crate::logging::redact_value;

/// One CSV column as the mapper sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSummary {
    pub name: String,
    pub hint: FieldHint,
    /// Template token the column provides, if any.
    pub token: Option<String>,
}

/// What `inspect` reports about a CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectSummary {
    pub headers: Vec<HeaderSummary>,
    pub rows: usize,
    /// Rows that produced a recipient (rows without an email are dropped).
    pub recipients: usize,
    pub display_column: Option<String>,
}

pub fn inspect_table(table: &CsvTable) -> InspectSummary {
    let headers = table
        .headers
        .iter()
        .map(|name| HeaderSummary {
            name: name.clone(),
            hint: normalize(name).hint,
            token: snake_token(name),
        })
        .collect();
    let display_column =
        pick_display_column(&table.headers, &table.rows).map(|idx| table.headers[idx].clone());
    InspectSummary {
        headers,
        rows: table.len(),
        recipients: recipients_from_table(table).len(),
        display_column,
    }
}

/// Parses a form field list: one field per line, optionally followed by a
/// tab and a field type (`text`, `checkbox`, `radio`, `choice`, `signature`,
/// `button`). Blank lines and lines starting with `#` are ignored.
pub fn parse_fields_file(text: &str) -> Vec<PdfField> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|line| match line.split_once('\t') {
            Some((name, kind)) => PdfField::new(name.trim(), parse_field_type(kind)),
            None => PdfField::text(line.trim()),
        })
        .collect()
}

fn parse_field_type(kind: &str) -> PdfFieldType {
    match kind.trim().to_ascii_lowercase().as_str() {
        "" | "text" => PdfFieldType::Text,
        "checkbox" => PdfFieldType::Checkbox,
        "radio" => PdfFieldType::Radio,
        "choice" => PdfFieldType::Choice,
        "signature" => PdfFieldType::Signature,
        "button" => PdfFieldType::Button,
        other => {
            tracing::warn!(kind = other, "unknown field type, treating as text");
            PdfFieldType::Text
        }
    }
}

/// Parses a message file.
///
/// A first line of the form `Subject: ...` becomes the subject and one
/// following blank line is skipped; everything else is the body.
pub fn parse_message_file(text: &str) -> MessageTemplate {
    let text = text.replace("\r\n", "\n");
    let (first, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
    match first.strip_prefix("Subject:") {
        Some(subject) => {
            let body = rest.strip_prefix('\n').unwrap_or(rest);
            MessageTemplate::new(subject.trim(), body.trim_end_matches('\n'))
        }
        None => MessageTemplate::new("", text.trim_end_matches('\n')),
    }
}

/// Reads a JSON field mapping. A missing file is an empty mapping.
pub fn load_mapping(path: &Path) -> Result<FieldMapping> {
    if !path.exists() {
        return Ok(FieldMapping::new());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("read mapping {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse mapping {}", path.display()))
}

/// Writes a field mapping as pretty JSON.
pub fn save_mapping(path: &Path, mapping: &FieldMapping) -> Result<()> {
    let json = serde_json::to_string_pretty(mapping)?;
    fs::write(path, json + "\n").with_context(|| format!("write mapping {}", path.display()))
}

/// Runs one auto-map pass over `mapping`, which keeps every existing entry.
pub fn auto_map_fields(
    fields: &[PdfField],
    headers: &[String],
    mapping: &mut FieldMapping,
    config: AutoMapConfig,
) -> MappingReport {
    let candidates = build_candidates(headers);
    AutoMapper::new(config).auto_map(fields, &candidates, mapping)
}

/// Inputs shared by every rendered message.
#[derive(Debug, Clone)]
pub struct RenderJob<'a> {
    pub template: &'a MessageTemplate,
    pub packet_title: &'a str,
    pub sender_name: &'a str,
    pub sender_email: &'a str,
    pub grammar: TokenGrammar,
    pub resolve: &'a ResolveContext,
}

/// Renders the message for each recipient, in order.
pub fn render_messages(
    job: &RenderJob<'_>,
    recipients: &[Recipient],
) -> Vec<(String, RenderedMessage)> {
    let ctx = TokenContext {
        packet_title: job.packet_title.to_string(),
        sender_name: job.sender_name.to_string(),
        sender_email: job.sender_email.to_string(),
        date: job.resolve.formatted_today(),
        file_name: format!("{}.pdf", job.packet_title),
    };
    recipients
        .iter()
        .map(|recipient| {
            let name = recipient.display_name();
            let rendered = render_message(job.template, recipient, &ctx, job.grammar, Vec::new());
            tracing::trace!(
                recipient = redact_value(&name),
                clean = rendered.report.is_clean(),
                "rendered message"
            );
            (name, rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields_file() {
        let fields = parse_fields_file(
            "# form\nFirst Name\n\nParent Signature\tsignature\nAgree\tcheckbox\n",
        );
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field_type, PdfFieldType::Text);
        assert_eq!(fields[1].name, "Parent Signature");
        assert_eq!(fields[1].field_type, PdfFieldType::Signature);
        assert_eq!(fields[2].field_type, PdfFieldType::Checkbox);
    }

    #[test]
    fn test_parse_message_file() {
        let template =
            parse_message_file("Subject: {{packet_title}}\r\n\r\nHi {{first_name}},\r\nThanks\r\n");
        assert_eq!(template.subject, "{{packet_title}}");
        assert_eq!(template.body, "Hi {{first_name}},\nThanks");
        assert!(template.is_enabled);

        let plain = parse_message_file("Just a body\n");
        assert_eq!(plain.subject, "");
        assert_eq!(plain.body, "Just a body");
    }
}
