//! Integration tests for CSV ingestion.

use std::io::Write;

use chrono::{TimeZone, Utc};
use pkt_ingest::{parse_csv, parse_recipients, read_csv_file};
use pkt_model::{CsvReference, FieldHint};
use tempfile::NamedTempFile;

fn reference() -> CsvReference {
    CsvReference {
        filename: "roster.csv".to_string(),
        stored_path: "/tmp/roster.csv".into(),
        imported_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

#[test]
fn parses_spec_examples() {
    let table = parse_csv("Name,Email\nJohn,john@example.com");
    assert_eq!(table.headers, vec!["Name", "Email"]);
    assert_eq!(table.rows, vec![vec!["John", "john@example.com"]]);

    let quoted = parse_csv("Name,Address\nJohn,\"123 Main St, Apt 4\"");
    assert_eq!(quoted.rows[0], vec!["John", "123 Main St, Apt 4"]);

    let escaped = parse_csv("Name,Quote\nJohn,\"He said \"\"Hello\"\"\"");
    assert_eq!(escaped.rows[0][1], "He said \"Hello\"");

    let mismatched = parse_csv("A,B\n1,2,3");
    assert!(mismatched.rows.is_empty());
}

#[test]
fn snapshot_normalizes_headers() {
    let table = parse_csv("ParentName,E-Mail Address,Date 1\nAnn Lee,ann@x.com,2024-01-01");
    let snapshot = table.snapshot(reference());
    let hints: Vec<FieldHint> = snapshot
        .normalized_headers
        .iter()
        .map(|n| n.hint)
        .collect();
    assert_eq!(
        hints,
        vec![FieldHint::FullName, FieldHint::Email, FieldHint::Date]
    );
}

#[test]
fn reads_file_with_bom_and_crlf() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all("\u{feff}First Name,Email\r\nAnn,ann@x.com\r\n".as_bytes())
        .unwrap();
    let table = read_csv_file(file.path()).unwrap();
    assert_eq!(table.headers, vec!["First Name", "Email"]);
    assert_eq!(table.len(), 1);
}

#[test]
fn recipients_keep_original_header_case() {
    let recipients = parse_recipients("Email,Coach NAME,room\nann@x.com,Ms Lee,12");
    let ann = &recipients[0];
    assert_eq!(ann.custom_fields["Coach NAME"], "Ms Lee");
    assert_eq!(ann.value_for_key("Coach Name").as_deref(), Some("Ms Lee"));
    assert_eq!(ann.value_for_key("Room").as_deref(), Some("12"));
}
