//! PDF form fields as reported by the PDF engine.

use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizedName, normalize};

/// Kind of interactive form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PdfFieldType {
    #[default]
    Text,
    Checkbox,
    Radio,
    Choice,
    Signature,
    Button,
}

/// A fillable field extracted from a PDF form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfField {
    /// Field name exactly as it appears in the form.
    pub name: String,
    pub field_type: PdfFieldType,
    pub default_value: Option<String>,
    /// Normalized name, computed once at extraction time.
    pub normalized: NormalizedName,
}

impl PdfField {
    /// Creates a field and caches its normalized name.
    pub fn new(name: impl Into<String>, field_type: PdfFieldType) -> Self {
        let name = name.into();
        let normalized = normalize(&name);
        Self {
            name,
            field_type,
            default_value: None,
            normalized,
        }
    }

    /// Shorthand for a text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, PdfFieldType::Text)
    }

    /// Returns a copy with a default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
