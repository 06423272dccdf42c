//! Message templates for email/share bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Subject and body text with `{{token}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
    pub is_enabled: bool,
    /// Per-token overrides binding a token to a CSV header.
    pub token_bindings: BTreeMap<String, String>,
}

impl MessageTemplate {
    /// Creates an enabled template with no bindings.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            is_enabled: true,
            token_bindings: BTreeMap::new(),
        }
    }

    /// Returns a copy with `token` bound to `header`.
    #[must_use]
    pub fn with_binding(mut self, token: impl Into<String>, header: impl Into<String>) -> Self {
        self.token_bindings.insert(token.into(), header.into());
        self
    }
}
