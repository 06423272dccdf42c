//! Recipients and key-based value resolution.
//!
//! A recipient carries a handful of structured properties plus free-form
//! custom fields imported from CSV columns. [`Recipient::value_for_key`]
//! resolves a lookup key (a built-in property name or an arbitrary CSV
//! header) to a value with graduated specificity, returning `None` instead
//! of guessing whenever more than one custom field could match.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize::normalize;

/// Where a recipient came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientSource {
    Contacts,
    Csv,
    Manual,
}

/// Structured properties that every recipient exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuiltInProperty {
    FirstName,
    LastName,
    FullName,
    Email,
    PhoneNumber,
}

impl BuiltInProperty {
    /// All built-in properties in presentation order.
    pub const ALL: [BuiltInProperty; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::FullName,
        Self::Email,
        Self::PhoneNumber,
    ];

    /// Canonical key stored in field mappings.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => "FirstName",
            Self::LastName => "LastName",
            Self::FullName => "FullName",
            Self::Email => "Email",
            Self::PhoneNumber => "PhoneNumber",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::FullName => "Full Name",
            Self::Email => "Email",
            Self::PhoneNumber => "Phone Number",
        }
    }

    /// Parses a canonical key (exact, case-sensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Looks up a header or key in the synonym table.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. The
    /// same table drives CSV column recognition and key resolution.
    pub fn from_synonym(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        match key.as_str() {
            "firstname" | "first_name" | "first name" | "first" | "given name" | "givenname"
            | "given_name" => Some(Self::FirstName),
            "lastname" | "last_name" | "last name" | "last" | "surname" | "family name"
            | "familyname" | "family_name" => Some(Self::LastName),
            "fullname" | "full_name" | "full name" | "name" => Some(Self::FullName),
            "email" | "e-mail" | "email address" | "email_address" | "emailaddress"
            | "e-mail address" | "mail" => Some(Self::Email),
            "phone" | "phonenumber" | "phone_number" | "phone number" | "mobile" | "telephone"
            | "tel" | "cell" => Some(Self::PhoneNumber),
            _ => None,
        }
    }
}

impl std::fmt::Display for BuiltInProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single document recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Extra columns keyed by the original header text.
    pub custom_fields: BTreeMap<String, String>,
    pub source: RecipientSource,
}

impl Recipient {
    /// Creates a recipient with a fresh id and no custom fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        source: RecipientSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: None,
            custom_fields: BTreeMap::new(),
            source,
        }
    }

    /// Returns a copy with the phone number set.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Returns a copy with a custom field added or replaced.
    #[must_use]
    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    /// First and last name joined by a space, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Full name, falling back to the email address.
    pub fn display_name(&self) -> String {
        let full = self.full_name();
        if full.is_empty() {
            self.email.trim().to_string()
        } else {
            full
        }
    }

    /// Uppercase initials of first and last name ("Jane Doe" -> "JD").
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Value of a structured property.
    pub fn property(&self, property: BuiltInProperty) -> Option<String> {
        match property {
            BuiltInProperty::FirstName => Some(self.first_name.clone()),
            BuiltInProperty::LastName => Some(self.last_name.clone()),
            BuiltInProperty::FullName => Some(self.full_name()),
            BuiltInProperty::Email => Some(self.email.clone()),
            BuiltInProperty::PhoneNumber => self.phone_number.clone(),
        }
    }

    /// Resolves a lookup key to a value.
    ///
    /// First match wins:
    /// 1. built-in synonym table (`first_name`, `Email`, `phone number`, ...);
    /// 2. exact custom-field key (whitespace-trimmed, case-sensitive);
    /// 3. unique case-insensitive custom-field key;
    /// 4. unique normalized token-set match ("Date" finds "Date 1").
    ///
    /// An all-lowercase key is a case-folded lookup and skips step 2, so
    /// `"company"` against `Company` and `company` columns is ambiguous.
    /// Ambiguity at step 3 or 4 yields `None`.
    pub fn value_for_key(&self, key: &str) -> Option<String> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(property) = BuiltInProperty::from_synonym(trimmed) {
            return self.property(property);
        }

        let case_folded = !trimmed.chars().any(char::is_uppercase);
        if !case_folded && let Some(value) = self.exact_custom(trimmed) {
            return Some(value.to_string());
        }

        let lowered = trimmed.to_lowercase();
        let insensitive: Vec<&String> = self
            .custom_fields
            .iter()
            .filter(|(k, _)| k.trim().to_lowercase() == lowered)
            .map(|(_, v)| v)
            .collect();
        match insensitive.len() {
            1 => return Some(insensitive[0].clone()),
            0 => {}
            count => {
                tracing::debug!(key = trimmed, count, "ambiguous case-insensitive field key");
                return None;
            }
        }

        let wanted = normalize(trimmed);
        if wanted.is_empty() {
            return None;
        }
        let wanted_set = wanted.token_set();
        let by_tokens: Vec<&String> = self
            .custom_fields
            .iter()
            .filter(|(k, _)| normalize(k).token_set() == wanted_set)
            .map(|(_, v)| v)
            .collect();
        match by_tokens.len() {
            1 => Some(by_tokens[0].clone()),
            0 => None,
            count => {
                tracing::debug!(key = trimmed, count, "ambiguous normalized field key");
                None
            }
        }
    }

    fn exact_custom(&self, trimmed: &str) -> Option<&str> {
        if let Some(value) = self.custom_fields.get(trimmed) {
            return Some(value);
        }
        let mut matches = self
            .custom_fields
            .iter()
            .filter(|(k, _)| k.trim() == trimmed)
            .map(|(_, v)| v.as_str());
        match (matches.next(), matches.next()) {
            (Some(value), None) => Some(value),
            _ => None,
        }
    }

    /// Distinct custom-field keys, in key order.
    pub fn custom_keys(&self) -> BTreeSet<&str> {
        self.custom_fields.keys().map(String::as_str).collect()
    }
}
