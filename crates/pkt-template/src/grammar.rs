//! Token grammars.
//!
//! A token is `{{`, optional whitespace, an identifier, optional whitespace,
//! `}}`. The two grammars differ only in the identifier character set.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `{{ Identifier }}` with letters, digits, `_`, `.` and `-`.
static EXTENDED_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("Invalid extended token regex")
});

/// `{{ identifier }}` restricted to lower snake case.
static SNAKE_CASE_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-z0-9_]+)\s*\}\}").expect("Invalid snake_case token regex")
});

/// Identifier character set accepted inside `{{ }}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenGrammar {
    /// `[a-z0-9_]+`; the canonical grammar used with validation.
    #[default]
    SnakeCase,
    /// `[A-Za-z0-9_.-]+`; accepts PascalCase tokens such as `{{FirstName}}`.
    Extended,
}

impl TokenGrammar {
    pub(crate) fn regex(self) -> &'static Regex {
        match self {
            Self::SnakeCase => LazyLock::force(&SNAKE_CASE_TOKEN_REGEX),
            Self::Extended => LazyLock::force(&EXTENDED_TOKEN_REGEX),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SnakeCase => "snake_case",
            Self::Extended => "extended",
        }
    }

    /// Parses a grammar name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "snake_case" | "snake" => Some(Self::SnakeCase),
            "extended" | "pascal_case" | "pascal" => Some(Self::Extended),
            _ => None,
        }
    }

    /// Token identifiers in `text`, in order of appearance, with repeats.
    pub fn scan<'a>(self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }
}

impl fmt::Display for TokenGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinct token identifiers in `text`, in first-seen order.
pub fn scan_tokens(grammar: TokenGrammar, text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in grammar.scan(text) {
        if !tokens.iter().any(|t| t == token) {
            tokens.push(token.to_string());
        }
    }
    tokens
}
