//! Export bundles: one folder per recipient plus a summary.
//!
//! ```text
//! Export-<template>-<yyyyMMdd-HHmmss>/
//!   Summary.csv
//!   <recipient>-<id prefix>/
//!     Packet.pdf
//!     Message.txt        (when a message template is enabled)
//! Export-<template>-<yyyyMMdd-HHmmss>.zip   (optional)
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pkt_map::{ResolveContext, resolve_field_values};
use pkt_model::{
    DeliveryMethod, FieldMapping, LogEntry, MessageTemplate, PdfField, Recipient,
};
use pkt_template::{TokenContext, TokenGrammar, ValidationReport, render_message};

use crate::engine::PdfEngine;
use crate::error::{OutputError, Result};
use crate::sanitize::sanitize_filename;
use crate::zip::write_zip_to_path;

pub const SUMMARY_FILE: &str = "Summary.csv";
pub const PACKET_FILE: &str = "Packet.pdf";
pub const MESSAGE_FILE: &str = "Message.txt";

/// Column headers of `Summary.csv`.
pub const SUMMARY_HEADERS: [&str; 5] =
    ["Recipient Name", "Email", "Folder", "PDF File", "Message File"];

/// Everything needed to export one template for many recipients.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub template_name: &'a str,
    /// The blank PDF form.
    pub pdf_template: &'a [u8],
    pub fields: &'a [PdfField],
    pub mapping: &'a FieldMapping,
    pub recipients: &'a [Recipient],
    /// Message written next to each packet when enabled.
    pub message: Option<&'a MessageTemplate>,
    pub grammar: TokenGrammar,
    pub sender_name: &'a str,
    pub sender_email: &'a str,
    pub resolve: ResolveContext,
    /// Flatten filled forms so they can no longer be edited.
    pub flatten: bool,
    /// Also archive the bundle folder as `<folder>.zip`.
    pub zip: bool,
}

/// One recipient's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedRecipient {
    pub name: String,
    pub email: String,
    /// Folder name inside the bundle.
    pub folder: String,
    pub pdf_file: PathBuf,
    pub message_file: Option<PathBuf>,
    /// Token findings for the rendered message.
    pub report: ValidationReport,
}

/// Result of [`export_bundle`].
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub directory: PathBuf,
    pub archive: Option<PathBuf>,
    pub recipients: Vec<ExportedRecipient>,
    /// One log entry per exported recipient.
    pub log: Vec<LogEntry>,
}

/// Folder name for a bundle created at `now`.
pub fn bundle_dir_name(template_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "Export-{}-{}",
        sanitize_filename(template_name),
        now.format("%Y%m%d-%H%M%S")
    )
}

/// Folder name for one recipient: display name plus an id prefix, so two
/// recipients with the same name never collide.
pub fn recipient_folder_name(recipient: &Recipient) -> String {
    let id = recipient.id.simple().to_string();
    format!(
        "{}-{}",
        sanitize_filename(&recipient.display_name()),
        &id[..8]
    )
}

/// Fills, writes and optionally archives packets for every recipient.
pub fn export_bundle(
    engine: &dyn PdfEngine,
    request: &ExportRequest<'_>,
    output_root: &Path,
    now: DateTime<Utc>,
) -> Result<ExportSummary> {
    let directory = output_root.join(bundle_dir_name(request.template_name, now));
    create_dir(&directory)?;

    let message = request.message.filter(|m| m.is_enabled);
    let date = request.resolve.formatted_today();
    let mut recipients = Vec::with_capacity(request.recipients.len());
    let mut log = Vec::with_capacity(request.recipients.len());

    for recipient in request.recipients {
        let name = recipient.display_name();
        let folder = recipient_folder_name(recipient);
        let folder_path = directory.join(&folder);
        create_dir(&folder_path)?;

        let values =
            resolve_field_values(request.fields, request.mapping, recipient, &request.resolve);
        let engine_error = |err: anyhow::Error| OutputError::Engine {
            recipient: name.clone(),
            message: format!("{err:#}"),
        };
        let mut pdf = engine
            .fill_fields(request.pdf_template, &values)
            .map_err(engine_error)?;
        if request.flatten {
            pdf = engine.flatten(&pdf).map_err(engine_error)?;
        }
        let pdf_file = folder_path.join(PACKET_FILE);
        write_file(&pdf_file, &pdf)?;

        let mut report = ValidationReport::default();
        let message_file = match message {
            Some(template) => {
                let ctx = TokenContext {
                    packet_title: request.template_name.to_string(),
                    sender_name: request.sender_name.to_string(),
                    sender_email: request.sender_email.to_string(),
                    date: date.clone(),
                    file_name: PACKET_FILE.to_string(),
                };
                let rendered =
                    render_message(template, recipient, &ctx, request.grammar, Vec::new());
                let path = folder_path.join(MESSAGE_FILE);
                let text = format!("Subject: {}\n\n{}\n", rendered.subject, rendered.body);
                write_file(&path, text.as_bytes())?;
                report = rendered.report;
                Some(path)
            }
            None => None,
        };

        log.push(LogEntry {
            recipient_name: name.clone(),
            template_name: request.template_name.to_string(),
            output_filename: format!("{folder}/{PACKET_FILE}"),
            sent_at: now,
            method: DeliveryMethod::Export,
        });
        recipients.push(ExportedRecipient {
            name,
            email: recipient.email.clone(),
            folder,
            pdf_file,
            message_file,
            report,
        });
    }

    write_summary(&directory.join(SUMMARY_FILE), &recipients)?;

    let archive = if request.zip {
        let archive = directory.with_extension("zip");
        write_zip_to_path(&directory, &archive)?;
        Some(archive)
    } else {
        None
    };

    tracing::info!(
        directory = %directory.display(),
        recipients = recipients.len(),
        zipped = archive.is_some(),
        "exported bundle"
    );
    Ok(ExportSummary {
        directory,
        archive,
        recipients,
        log,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| OutputError::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_summary(path: &Path, recipients: &[ExportedRecipient]) -> Result<()> {
    let csv_error = |e: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(SUMMARY_HEADERS).map_err(csv_error)?;
    for recipient in recipients {
        let message = if recipient.message_file.is_some() {
            MESSAGE_FILE
        } else {
            ""
        };
        writer
            .write_record([
                recipient.name.as_str(),
                recipient.email.as_str(),
                recipient.folder.as_str(),
                PACKET_FILE,
                message,
            ])
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
