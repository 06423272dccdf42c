//! Plain-text reports.

use std::fmt::Write;

use pkt_map::MappingReport;
use pkt_model::{FieldMapping, MappingTarget};
use pkt_output::OutputError;
use pkt_persistence::PersistenceError;
use pkt_template::ValidationReport;

/// Human-readable summary of an auto-map pass.
///
/// `mapping` is the mapping after the pass; preserved fields show the value
/// they kept.
pub fn format_mapping_report(report: &MappingReport, mapping: &FieldMapping) -> String {
    let mut out = String::new();

    section(&mut out, "Mapped", report.mapped.len());
    for (field, value) in &report.mapped {
        let _ = writeln!(out, "  {field} -> {}", MappingTarget::parse(value).label());
    }

    section(&mut out, "Kept", report.preserved.len());
    for field in &report.preserved {
        let label = mapping
            .target_for(field)
            .map_or_else(String::new, |target| target.label());
        let _ = writeln!(out, "  {field} -> {label}");
    }

    section(&mut out, "Needs review", report.unmapped.len());
    for field in &report.unmapped {
        let _ = writeln!(out, "  {field}");
    }

    section(
        &mut out,
        "Signature fields (never auto-mapped)",
        report.signature_fields.len(),
    );
    for field in &report.signature_fields {
        let _ = writeln!(out, "  {field}");
    }

    out
}

fn section(out: &mut String, title: &str, count: usize) {
    let _ = writeln!(out, "{title} ({count}):");
    if count == 0 {
        let _ = writeln!(out, "  -");
    }
}

/// One line per finding, or `None` for a clean report.
pub fn format_validation_report(report: &ValidationReport) -> Option<String> {
    if report.is_clean() {
        return None;
    }
    let mut lines = Vec::new();
    if !report.unknown_tokens.is_empty() {
        lines.push(format!("unknown tokens: {}", braces(&report.unknown_tokens)));
    }
    if !report.unresolved_tokens.is_empty() {
        lines.push(format!("empty tokens: {}", braces(&report.unresolved_tokens)));
    }
    lines.extend(report.required_field_issues.iter().cloned());
    Some(lines.join("\n"))
}

fn braces(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("{{{{{t}}}}}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-language help for a failed command, when the cause is a storage
/// or output error.
pub fn format_error_help(error: &anyhow::Error) -> Option<String> {
    error.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<PersistenceError>() {
            let mut help = err.user_message();
            if let Some(suggestion) = err.suggestion() {
                help.push('\n');
                help.push_str(&suggestion);
            }
            return Some(help);
        }
        cause
            .downcast_ref::<OutputError>()
            .map(OutputError::user_message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_clean_validation_report() {
        assert_eq!(format_validation_report(&ValidationReport::default()), None);
    }

    #[test]
    fn test_validation_report_lines() {
        let report = ValidationReport {
            unknown_tokens: vec!["room".into(), "Coach".into()],
            unresolved_tokens: vec!["sender_name".into()],
            required_field_issues: vec!["Signature not mapped".into()],
        };
        assert_eq!(
            format_validation_report(&report).as_deref(),
            Some(
                "unknown tokens: {{room}}, {{Coach}}\n\
                 empty tokens: {{sender_name}}\n\
                 Signature not mapped"
            )
        );
    }

    #[test]
    fn test_error_help_for_newer_state_file() {
        let result: anyhow::Result<()> = Err(PersistenceError::UnsupportedVersion {
            found: 4,
            max_supported: 1,
            path: PathBuf::from("state.json"),
        })
        .context("load saved state");
        let help = format_error_help(&result.unwrap_err()).unwrap();
        assert!(help.contains("file version 4"));
        assert!(help.ends_with("\nInstall the latest version."));
    }

    #[test]
    fn test_error_help_for_archive_destination() {
        let error = anyhow::Error::new(OutputError::InvalidDestination {
            path: PathBuf::from("out/out.zip"),
            reason: "destination is inside the source directory",
        })
        .context("archive out");
        assert_eq!(
            format_error_help(&error).as_deref(),
            Some("Choose another location: destination is inside the source directory.")
        );
    }

    #[test]
    fn test_error_help_absent_for_other_errors() {
        assert_eq!(format_error_help(&anyhow::anyhow!("boom")), None);
    }
}
