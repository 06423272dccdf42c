//! Token vocabularies and per-recipient token values.
//!
//! Two vocabularies exist. The canonical snake-case one (`recipient_name`,
//! `sender_email`, ...) is open-ended: every CSV column also contributes a
//! token via [`snake_token`]. The PascalCase one (`FirstName`, `FileName`,
//! ...) is fixed and only understood by the extended grammar;
//! [`migrate_pascal_tokens`] rewrites it to the snake-case names.

use std::collections::{BTreeMap, BTreeSet};

use pkt_model::{MessageTemplate, Recipient};
use regex::Captures;

use crate::grammar::TokenGrammar;
use crate::render::{ValidationReport, render_validated_with};

/// System tokens of the snake-case vocabulary.
pub const SNAKE_CASE_TOKENS: &[&str] = &[
    "recipient_name",
    "recipient_email",
    "first_name",
    "last_name",
    "packet_title",
    "date",
    "sender_name",
    "sender_email",
    "file_name",
];

/// The fixed PascalCase vocabulary and its snake-case equivalents.
pub const PASCAL_CASE_TOKENS: &[(&str, &str)] = &[
    ("FirstName", "first_name"),
    ("LastName", "last_name"),
    ("FullName", "recipient_name"),
    ("Email", "recipient_email"),
    ("TemplateName", "packet_title"),
    ("FileName", "file_name"),
];

/// Values that do not come from the recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenContext {
    pub packet_title: String,
    pub sender_name: String,
    pub sender_email: String,
    /// Already formatted date.
    pub date: String,
    /// Output file name for the recipient's packet.
    pub file_name: String,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Snake-case system token values for one recipient.
pub fn snake_case_tokens(
    recipient: &Recipient,
    ctx: &TokenContext,
) -> BTreeMap<String, Option<String>> {
    let values = [
        ("recipient_name", non_empty(recipient.display_name())),
        ("recipient_email", non_empty(recipient.email.as_str())),
        ("first_name", non_empty(recipient.first_name.as_str())),
        ("last_name", non_empty(recipient.last_name.as_str())),
        ("packet_title", non_empty(ctx.packet_title.as_str())),
        ("date", non_empty(ctx.date.as_str())),
        ("sender_name", non_empty(ctx.sender_name.as_str())),
        ("sender_email", non_empty(ctx.sender_email.as_str())),
        ("file_name", non_empty(ctx.file_name.as_str())),
    ];
    values
        .into_iter()
        .map(|(token, value)| (token.to_string(), value))
        .collect()
}

/// PascalCase token values for one recipient.
pub fn pascal_case_tokens(
    recipient: &Recipient,
    ctx: &TokenContext,
) -> BTreeMap<String, Option<String>> {
    let values = [
        ("FirstName", non_empty(recipient.first_name.as_str())),
        ("LastName", non_empty(recipient.last_name.as_str())),
        ("FullName", non_empty(recipient.full_name())),
        ("Email", non_empty(recipient.email.as_str())),
        ("TemplateName", non_empty(ctx.packet_title.as_str())),
        ("FileName", non_empty(ctx.file_name.as_str())),
    ];
    values
        .into_iter()
        .map(|(token, value)| (token.to_string(), value))
        .collect()
}

/// Token values of both vocabularies.
pub fn system_tokens(
    recipient: &Recipient,
    ctx: &TokenContext,
) -> BTreeMap<String, Option<String>> {
    let mut tokens = snake_case_tokens(recipient, ctx);
    tokens.extend(pascal_case_tokens(recipient, ctx));
    tokens
}

/// Snake-case token name for a CSV header.
///
/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single `_`: "Room #" becomes `room`, "Date 1" becomes `date_1`. Headers
/// with no alphanumeric characters have no token.
pub fn snake_token(header: &str) -> Option<String> {
    let mut token = String::with_capacity(header.len());
    for ch in header.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            token.push(ch.to_ascii_lowercase());
        } else if !token.ends_with('_') {
            token.push('_');
        }
    }
    let token = token.trim_matches('_');
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Full token map for one message: system tokens, then one token per custom
/// field, then the template's explicit bindings.
///
/// Custom fields never shadow system tokens, and when two headers produce the
/// same token the first (in key order) wins. Bindings always win; a binding
/// whose header does not resolve makes the token known but empty.
pub fn message_tokens(
    template: &MessageTemplate,
    recipient: &Recipient,
    ctx: &TokenContext,
) -> BTreeMap<String, Option<String>> {
    let mut tokens = system_tokens(recipient, ctx);

    for (header, value) in &recipient.custom_fields {
        if let Some(token) = snake_token(header) {
            tokens
                .entry(token)
                .or_insert_with(|| non_empty(value.as_str()));
        }
    }

    for (token, header) in &template.token_bindings {
        let value = recipient.value_for_key(header).and_then(non_empty);
        tokens.insert(token.clone(), value);
    }

    tokens
}

/// Rewrites PascalCase tokens to their snake-case names.
///
/// `"Dear {{ FirstName }}"` becomes `"Dear {{first_name}}"`. Tokens outside
/// the PascalCase vocabulary are left as they are.
pub fn migrate_pascal_tokens(text: &str) -> String {
    TokenGrammar::Extended
        .regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let token = caps.get(1).map_or("", |m| m.as_str());
            PASCAL_CASE_TOKENS
                .iter()
                .find(|(pascal, _)| *pascal == token)
                .map_or_else(
                    || caps[0].to_string(),
                    |(_, snake)| format!("{{{{{snake}}}}}"),
                )
        })
        .into_owned()
}

/// Rendered subject and body for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
    /// Combined report for subject and body.
    pub report: ValidationReport,
}

/// Renders a template for one recipient.
///
/// The allowed vocabulary is every token [`message_tokens`] produces.
pub fn render_message(
    template: &MessageTemplate,
    recipient: &Recipient,
    ctx: &TokenContext,
    grammar: TokenGrammar,
    required_field_issues: Vec<String>,
) -> RenderedMessage {
    let tokens = message_tokens(template, recipient, ctx);
    let allowed: BTreeSet<String> = tokens.keys().cloned().collect();

    let subject =
        render_validated_with(grammar, &template.subject, &allowed, &tokens, Vec::new());
    let body = render_validated_with(
        grammar,
        &template.body,
        &allowed,
        &tokens,
        required_field_issues,
    );

    let mut report = subject.report;
    report.merge(body.report);

    RenderedMessage {
        subject: subject.text,
        body: body.text,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkt_model::RecipientSource;

    fn ann() -> Recipient {
        Recipient::new("Ann", "Lee", "ann@x.com", RecipientSource::Csv)
            .with_custom_field("Room #", "12")
            .with_custom_field("Date 1", "2024-05-01")
    }

    #[test]
    fn test_snake_token() {
        assert_eq!(snake_token("Room #").as_deref(), Some("room"));
        assert_eq!(snake_token("Date 1").as_deref(), Some("date_1"));
        assert_eq!(snake_token("  Parent -- Name ").as_deref(), Some("parent_name"));
        assert_eq!(snake_token("###"), None);
    }

    #[test]
    fn test_system_tokens_cover_both_vocabularies() {
        let tokens = system_tokens(&ann(), &TokenContext::default());
        for token in SNAKE_CASE_TOKENS {
            assert!(tokens.contains_key(*token), "{token}");
        }
        for (token, _) in PASCAL_CASE_TOKENS {
            assert!(tokens.contains_key(*token), "{token}");
        }
        assert_eq!(tokens["recipient_name"].as_deref(), Some("Ann Lee"));
        assert_eq!(tokens["sender_name"], None);
    }

    #[test]
    fn test_custom_fields_do_not_shadow_system_tokens() {
        let recipient = ann().with_custom_field("Date", "custom");
        let ctx = TokenContext {
            date: "01/02/2025".into(),
            ..TokenContext::default()
        };
        let tokens = message_tokens(&MessageTemplate::default(), &recipient, &ctx);
        assert_eq!(tokens["date"].as_deref(), Some("01/02/2025"));
        assert_eq!(tokens["room"].as_deref(), Some("12"));
        assert_eq!(tokens["date_1"].as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn test_bindings_override() {
        let template = MessageTemplate::new("", "")
            .with_binding("date", "Date 1")
            .with_binding("coach", "Coach");
        let tokens = message_tokens(&template, &ann(), &TokenContext::default());
        assert_eq!(tokens["date"].as_deref(), Some("2024-05-01"));
        assert_eq!(tokens["coach"], None);
    }

    #[test]
    fn test_migrate_pascal_tokens() {
        assert_eq!(
            migrate_pascal_tokens("Dear {{ FirstName }}, see {{FileName}} {{Other}}"),
            "Dear {{first_name}}, see {{file_name}} {{Other}}"
        );
    }
}
