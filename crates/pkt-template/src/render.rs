//! Token substitution.
//!
//! Every match span is computed against the untouched input and the output
//! is assembled in one pass, so repeated tokens and values containing `{{`
//! never disturb other matches. Substituted values are inserted verbatim and
//! are never rendered again.

use std::collections::{BTreeMap, BTreeSet};

use regex::Captures;
use serde::Serialize;

use crate::grammar::TokenGrammar;

/// How a token resolves against the available values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenResolution {
    /// Not a known token; left verbatim, braces included.
    Unknown,
    /// Known token without a value; renders as the empty string.
    KnownEmpty,
    /// Known token with a value; renders as that value.
    KnownWithValue(String),
}

impl TokenResolution {
    /// Resolution of `token` in a `token -> Option<value>` map.
    pub fn lookup(resolved: &BTreeMap<String, Option<String>>, token: &str) -> Self {
        match resolved.get(token) {
            None => Self::Unknown,
            Some(None) => Self::KnownEmpty,
            Some(Some(value)) => Self::KnownWithValue(value.clone()),
        }
    }

    /// True when the token is known but its trimmed value is empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Unknown => false,
            Self::KnownEmpty => true,
            Self::KnownWithValue(value) => value.trim().is_empty(),
        }
    }
}

/// Advisory findings from a validated render. Never affects the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Tokens in the text that are not in the allowed vocabulary.
    pub unknown_tokens: Vec<String>,
    /// Allowed tokens whose value is missing or blank.
    pub unresolved_tokens: Vec<String>,
    /// Caller-supplied issues, passed through untouched.
    pub required_field_issues: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_tokens.is_empty()
            && self.unresolved_tokens.is_empty()
            && self.required_field_issues.is_empty()
    }

    /// Folds `other` into `self`, keeping first-seen order without repeats.
    pub fn merge(&mut self, other: ValidationReport) {
        push_unique(&mut self.unknown_tokens, other.unknown_tokens);
        push_unique(&mut self.unresolved_tokens, other.unresolved_tokens);
        push_unique(&mut self.required_field_issues, other.required_field_issues);
    }
}

fn push_unique(target: &mut Vec<String>, items: Vec<String>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

/// Rendered text plus its validation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub text: String,
    pub report: ValidationReport,
}

/// Renders `text` with the extended grammar.
///
/// ```
/// use std::collections::BTreeMap;
/// use pkt_template::render;
///
/// let values = BTreeMap::from([("name".to_string(), Some("Sam".to_string()))]);
/// assert_eq!(render("Hello {{name}}", &values), "Hello Sam");
/// assert_eq!(render("Hello {{unknown}}", &values), "Hello {{unknown}}");
/// ```
pub fn render(text: &str, resolved: &BTreeMap<String, Option<String>>) -> String {
    render_with(TokenGrammar::Extended, text, |token| {
        TokenResolution::lookup(resolved, token)
    })
}

/// Renders `text`, resolving each token through `resolve`.
pub fn render_with<F>(grammar: TokenGrammar, text: &str, resolve: F) -> String
where
    F: Fn(&str) -> TokenResolution,
{
    grammar
        .regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let token = caps.get(1).map_or("", |m| m.as_str());
            match resolve(token) {
                TokenResolution::Unknown => caps[0].to_string(),
                TokenResolution::KnownEmpty => String::new(),
                TokenResolution::KnownWithValue(value) => value,
            }
        })
        .into_owned()
}

/// Renders `text` with the snake-case grammar against a fixed vocabulary.
///
/// Tokens outside `allowed` stay verbatim and are reported as unknown.
/// Allowed tokens render their value, or nothing when the value is missing;
/// blank ones are reported as unresolved.
pub fn render_validated(
    text: &str,
    allowed: &BTreeSet<String>,
    resolved: &BTreeMap<String, Option<String>>,
    required_field_issues: Vec<String>,
) -> RenderOutput {
    render_validated_with(
        TokenGrammar::SnakeCase,
        text,
        allowed,
        resolved,
        required_field_issues,
    )
}

/// [`render_validated`] with an explicit grammar.
pub fn render_validated_with(
    grammar: TokenGrammar,
    text: &str,
    allowed: &BTreeSet<String>,
    resolved: &BTreeMap<String, Option<String>>,
    required_field_issues: Vec<String>,
) -> RenderOutput {
    let classify = |token: &str| {
        if !allowed.contains(token) {
            return TokenResolution::Unknown;
        }
        match TokenResolution::lookup(resolved, token) {
            TokenResolution::Unknown => TokenResolution::KnownEmpty,
            known => known,
        }
    };

    let mut report = ValidationReport {
        required_field_issues,
        ..ValidationReport::default()
    };
    for token in grammar.scan(text) {
        let resolution = classify(token);
        let bucket = match resolution {
            TokenResolution::Unknown => &mut report.unknown_tokens,
            ref known if known.is_blank() => &mut report.unresolved_tokens,
            _ => continue,
        };
        if !bucket.iter().any(|t| t == token) {
            bucket.push(token.to_string());
        }
    }

    if !report.unknown_tokens.is_empty() {
        tracing::debug!(unknown = ?report.unknown_tokens, "template has unknown tokens");
    }

    RenderOutput {
        text: render_with(grammar, text, classify),
        report,
    }
}
