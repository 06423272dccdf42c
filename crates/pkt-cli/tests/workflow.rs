use std::fs;

use chrono::NaiveDate;
use pkt_cli::report::format_mapping_report;
use pkt_cli::workflow::{
    RenderJob, auto_map_fields, inspect_table, load_mapping, parse_fields_file,
    parse_message_file, render_messages, save_mapping,
};
use pkt_ingest::{parse_csv, recipients_from_table};
use pkt_map::{AutoMapConfig, ResolveContext};
use pkt_model::{FieldHint, FieldMapping, MappingTarget};
use pkt_template::TokenGrammar;
use tempfile::tempdir;

const ROSTER: &str = "Student Name,Email,Room #\n\
                      Ann Lee,ann@x.com,12\n\
                      Bo Park,,14\n\
                      Cy Diaz,cy@x.com,15\n";

const FIELDS: &str = "First Name\n\
                      Last Name\n\
                      Student Name\n\
                      Parent Email\n\
                      Room #\n\
                      Initials\n\
                      Parent Signature\tsignature\n\
                      Notes\n";

#[test]
fn inspect_reports_hints_and_display_column() {
    let summary = inspect_table(&parse_csv(ROSTER));

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.recipients, 2);
    assert_eq!(summary.display_column.as_deref(), Some("Student Name"));

    let hints: Vec<FieldHint> = summary.headers.iter().map(|h| h.hint).collect();
    assert_eq!(
        hints,
        vec![FieldHint::FullName, FieldHint::Email, FieldHint::Unknown]
    );
    let tokens: Vec<Option<&str>> = summary
        .headers
        .iter()
        .map(|h| h.token.as_deref())
        .collect();
    assert_eq!(
        tokens,
        vec![Some("student_name"), Some("email"), Some("room")]
    );
}

#[test]
fn mapping_report_text() {
    let table = parse_csv(ROSTER);
    let fields = parse_fields_file(FIELDS);
    let mut mapping = FieldMapping::new();
    mapping.set("Notes", &MappingTarget::ComputedBlank);

    let report = auto_map_fields(
        &fields,
        &table.headers,
        &mut mapping,
        AutoMapConfig::default(),
    );
    let text = format_mapping_report(&report, &mapping);

    insta::assert_snapshot!(text.trim_end(), @r"
    Mapped (5):
      First Name -> First Name
      Last Name -> Last Name
      Student Name -> Student Name
      Parent Email -> Email
      Initials -> Initials
    Kept (1):
      Notes -> Blank
    Needs review (1):
      Room #
    Signature fields (never auto-mapped) (1):
      Parent Signature
    ");
}

#[test]
fn mapping_file_round_trip_keeps_manual_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    assert!(load_mapping(&path).unwrap().is_empty());

    let mut mapping = FieldMapping::new();
    mapping.set("Room #", &MappingTarget::CsvHeader("Room #".into()));
    save_mapping(&path, &mapping).unwrap();

    let mut loaded = load_mapping(&path).unwrap();
    let table = parse_csv(ROSTER);
    let fields = parse_fields_file(FIELDS);
    auto_map_fields(
        &fields,
        &table.headers,
        &mut loaded,
        AutoMapConfig::default(),
    );
    assert_eq!(loaded.get("Room #"), Some("Room #"));
    assert_eq!(loaded.get("First Name"), Some("FirstName"));

    let json = fs::read_to_string(&path).unwrap();
    assert_eq!(json, "{\n  \"Room #\": \"Room #\"\n}\n");
}

#[test]
fn renders_one_message_per_recipient() {
    let recipients = recipients_from_table(&parse_csv(ROSTER));
    let template = parse_message_file(
        "Subject: {{packet_title}} for {{first_name}}\n\n\
         Room {{room}} on {{date}}.\n{{sender_name}}",
    );
    let resolve = ResolveContext::new(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap());
    let job = RenderJob {
        template: &template,
        packet_title: "Field Trip",
        sender_name: "",
        sender_email: "",
        grammar: TokenGrammar::SnakeCase,
        resolve: &resolve,
    };

    let rendered = render_messages(&job, &recipients);
    assert_eq!(rendered.len(), 2);

    let (name, ann) = &rendered[0];
    assert_eq!(name, "Ann Lee");
    assert_eq!(ann.subject, "Field Trip for Ann");
    assert_eq!(ann.body, "Room 12 on 03/09/2025.\n");
    assert_eq!(ann.report.unresolved_tokens, vec!["sender_name"]);
    assert!(ann.report.unknown_tokens.is_empty());

    assert_eq!(rendered[1].0, "Cy Diaz");
}
