//! Field and header name normalization.
//!
//! Turns an arbitrary PDF form-field name or CSV header ("Date1",
//! "ParentName", "E-Mail Address") into a lowercase token sequence and a
//! semantic [`FieldHint`]. The result is a pure function of the input string,
//! so mappings built on top of it are reproducible.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Semantic classification of a field or header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldHint {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Date,
    Initials,
    Signature,
    Unknown,
}

impl FieldHint {
    /// Returns a human-readable label for the hint.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::FullName => "full name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Initials => "initials",
            Self::Signature => "signature",
            Self::Unknown => "unknown",
        }
    }

    /// True for every hint except [`FieldHint::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for FieldHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized view of a raw field or header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedName {
    /// The raw string as supplied.
    pub original: String,
    /// Lowercase tokens after boundary splitting and stopword removal.
    pub tokens: Vec<String>,
    /// Classification derived from `tokens`.
    pub hint: FieldHint,
}

impl NormalizedName {
    /// Normalizes `raw`. Equivalent to [`normalize`].
    pub fn new(raw: &str) -> Self {
        normalize(raw)
    }

    /// Distinct tokens as a set.
    pub fn token_set(&self) -> BTreeSet<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }

    /// True when normalization left no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "to", "for", "in", "on", "at", "field", "value", "text",
];

const SIGNATURE_TOKENS: &[&str] = &["signature", "sign", "signed", "sig"];
const INITIALS_TOKENS: &[&str] = &["initials", "initial", "inits"];
const EMAIL_TOKENS: &[&str] = &["email", "mail"];
const PHONE_TOKENS: &[&str] = &["phone", "telephone", "tel", "mobile", "cell", "phonenumber"];
const DATE_TOKENS: &[&str] = &["date", "dob", "day"];

/// Normalizes a raw field or header name.
///
/// Never fails; names with no recognizable tokens classify as
/// [`FieldHint::Unknown`].
pub fn normalize(raw: &str) -> NormalizedName {
    let split = insert_boundaries(raw.trim());
    let tokens: Vec<String> = split
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| !STOPWORDS.contains(token))
        .filter(|token| !token.chars().all(|ch| ch.is_ascii_digit()))
        .map(str::to_string)
        .collect();
    let hint = classify(&tokens);
    NormalizedName {
        original: raw.to_string(),
        tokens,
        hint,
    }
}

/// Inserts a space at camelCase and letter/digit boundaries.
fn insert_boundaries(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut prev: Option<char> = None;
    for ch in raw.chars() {
        if let Some(p) = prev {
            let camel = p.is_lowercase() && ch.is_uppercase();
            let letter_digit = (p.is_alphabetic() && ch.is_ascii_digit())
                || (p.is_ascii_digit() && ch.is_alphabetic());
            if camel || letter_digit {
                out.push(' ');
            }
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}

/// Classifies a token sequence. Rule order is significant: a signature
/// token outranks everything else, so "Signature Date" is a signature.
fn classify(tokens: &[String]) -> FieldHint {
    let has = |needle: &str| tokens.iter().any(|t| t == needle);
    let has_any = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));

    if has_any(SIGNATURE_TOKENS) {
        return FieldHint::Signature;
    }
    if has_any(INITIALS_TOKENS) {
        return FieldHint::Initials;
    }
    if has_any(EMAIL_TOKENS) || has("emailaddress") {
        return FieldHint::Email;
    }
    if has_any(PHONE_TOKENS) {
        return FieldHint::Phone;
    }
    if has_any(DATE_TOKENS) {
        return FieldHint::Date;
    }
    if (has("first") && has("name")) || has("firstname") {
        return FieldHint::FirstName;
    }
    if (has("last") && has("name")) || has("lastname") {
        return FieldHint::LastName;
    }
    if (has("full") && has("name")) || has("fullname") {
        return FieldHint::FullName;
    }
    if has("name") {
        // A lone "Name" is ambiguous.
        return if tokens.len() > 1 {
            FieldHint::FullName
        } else {
            FieldHint::Unknown
        };
    }
    FieldHint::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_split() {
        let name = normalize("FirstName");
        assert_eq!(name.tokens, vec!["first", "name"]);
        assert_eq!(name.hint, FieldHint::FirstName);
    }

    #[test]
    fn test_digit_boundary_dropped() {
        assert_eq!(normalize("Date 1").tokens, vec!["date"]);
        assert_eq!(normalize("Date1").tokens, vec!["date"]);
        assert_eq!(normalize("2ndPhone").tokens, vec!["nd", "phone"]);
    }

    #[test]
    fn test_signature_outranks_date() {
        assert_eq!(normalize("Signature Date").hint, FieldHint::Signature);
        assert_eq!(normalize("Date Signed").hint, FieldHint::Signature);
    }

    #[test]
    fn test_email_variants() {
        assert_eq!(normalize("E-Mail Address").hint, FieldHint::Email);
        assert_eq!(normalize("email").hint, FieldHint::Email);
        assert_eq!(normalize("ParentEmail").hint, FieldHint::Email);
    }

    #[test]
    fn test_stopwords_removed() {
        let name = normalize("Name of the Parent Field");
        assert_eq!(name.tokens, vec!["name", "parent"]);
        assert_eq!(name.hint, FieldHint::FullName);
    }

    #[test]
    fn test_lone_name_is_unknown() {
        assert_eq!(normalize("Name").hint, FieldHint::Unknown);
        assert_eq!(normalize("ParentName").hint, FieldHint::FullName);
        assert_eq!(normalize("fullname").hint, FieldHint::FullName);
    }

    #[test]
    fn test_initials_and_phone() {
        assert_eq!(normalize("Initials 3").hint, FieldHint::Initials);
        assert_eq!(normalize("PhoneNumber").hint, FieldHint::Phone);
        assert_eq!(normalize("Mobile #").hint, FieldHint::Phone);
    }

    #[test]
    fn test_date_variants() {
        assert_eq!(normalize("Birth Day").hint, FieldHint::Date);
        assert_eq!(normalize("DOB").hint, FieldHint::Date);
        assert_eq!(normalize("Date1").hint, FieldHint::Date);
        assert_eq!(normalize("Today's Date").hint, FieldHint::Date);
        assert_eq!(normalize("Birthday").hint, FieldHint::Unknown);
        assert_eq!(normalize("phonenumber").hint, FieldHint::Phone);
        assert_eq!(normalize("Inits").hint, FieldHint::Initials);
    }

    #[test]
    fn test_empty_input() {
        let name = normalize("   ");
        assert!(name.is_empty());
        assert_eq!(name.hint, FieldHint::Unknown);
        assert_eq!(name.original, "   ");
    }
}
