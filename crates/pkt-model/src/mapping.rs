//! Field mapping types.
//!
//! A field mapping binds PDF field names to a [`MappingTarget`]. Targets are
//! strongly typed in memory and only become strings at the persistence
//! boundary, where the stable form is:
//!
//! | Target                  | Stored as               |
//! |-------------------------|-------------------------|
//! | `BuiltIn(FirstName)`    | `FirstName`             |
//! | `ComputedToday`         | `__computed__:today`    |
//! | `ComputedInitials`      | `__computed__:initials` |
//! | `ComputedBlank`         | `__computed__:blank`    |
//! | `CsvHeader(h)`          | `h` verbatim            |

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizedName, normalize};
use crate::recipient::BuiltInProperty;

const COMPUTED_PREFIX: &str = "__computed__:";
pub const COMPUTED_TODAY: &str = "__computed__:today";
pub const COMPUTED_INITIALS: &str = "__computed__:initials";
pub const COMPUTED_BLANK: &str = "__computed__:blank";

/// What a PDF field is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum MappingTarget {
    BuiltIn(BuiltInProperty),
    ComputedToday,
    ComputedInitials,
    ComputedBlank,
    CsvHeader(String),
}

impl MappingTarget {
    /// Parses the stable string form. Anything unrecognized is a CSV header.
    pub fn parse(value: &str) -> Self {
        if let Some(property) = BuiltInProperty::from_key(value) {
            return Self::BuiltIn(property);
        }
        match value {
            COMPUTED_TODAY => Self::ComputedToday,
            COMPUTED_INITIALS => Self::ComputedInitials,
            COMPUTED_BLANK => Self::ComputedBlank,
            other => Self::CsvHeader(other.to_string()),
        }
    }

    /// Stable string form.
    pub fn as_key(&self) -> &str {
        match self {
            Self::BuiltIn(property) => property.key(),
            Self::ComputedToday => COMPUTED_TODAY,
            Self::ComputedInitials => COMPUTED_INITIALS,
            Self::ComputedBlank => COMPUTED_BLANK,
            Self::CsvHeader(header) => header,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(
            self,
            Self::ComputedToday | Self::ComputedInitials | Self::ComputedBlank
        )
    }

    /// Display label used in pickers.
    pub fn label(&self) -> String {
        match self {
            Self::BuiltIn(property) => property.label().to_string(),
            Self::ComputedToday => "Today's Date".to_string(),
            Self::ComputedInitials => "Initials".to_string(),
            Self::ComputedBlank => "Blank".to_string(),
            Self::CsvHeader(header) => header.clone(),
        }
    }
}

impl fmt::Display for MappingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl From<String> for MappingTarget {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for MappingTarget {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<MappingTarget> for String {
    fn from(target: MappingTarget) -> Self {
        target.as_key().to_string()
    }
}

/// True if `value` uses the reserved computed prefix.
pub fn is_computed_key(value: &str) -> bool {
    value.starts_with(COMPUTED_PREFIX)
}

/// Origin of a mapping candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateKind {
    BuiltIn,
    CsvHeader,
    Computed,
}

/// One selectable target for a PDF field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingCandidate {
    /// Stable key stored in the field mapping.
    pub value: String,
    pub label: String,
    pub normalized: NormalizedName,
    pub kind: CandidateKind,
}

impl MappingCandidate {
    /// Candidate for a built-in recipient property.
    pub fn built_in(property: BuiltInProperty) -> Self {
        Self {
            value: property.key().to_string(),
            label: property.label().to_string(),
            normalized: normalize(property.key()),
            kind: CandidateKind::BuiltIn,
        }
    }

    /// Candidate for a CSV column; the header text is kept verbatim.
    pub fn csv_header(header: &str) -> Self {
        Self {
            value: header.to_string(),
            label: header.to_string(),
            normalized: normalize(header),
            kind: CandidateKind::CsvHeader,
        }
    }

    /// Candidate for a computed sentinel. Non-computed targets fall through
    /// to their own candidate kinds.
    pub fn computed(target: &MappingTarget) -> Self {
        let phrase = match target {
            MappingTarget::ComputedToday => "Today Date",
            MappingTarget::ComputedInitials => "Initials",
            MappingTarget::ComputedBlank => "Blank",
            MappingTarget::BuiltIn(property) => return Self::built_in(*property),
            MappingTarget::CsvHeader(header) => return Self::csv_header(header),
        };
        Self {
            value: target.as_key().to_string(),
            label: target.label(),
            normalized: normalize(phrase),
            kind: CandidateKind::Computed,
        }
    }

    /// Parsed form of `value`.
    pub fn target(&self) -> MappingTarget {
        match self.kind {
            CandidateKind::CsvHeader => MappingTarget::CsvHeader(self.value.clone()),
            _ => MappingTarget::parse(&self.value),
        }
    }

    /// False for the today and blank sentinels, which are only ever chosen
    /// by hand.
    pub fn is_auto_mappable(&self) -> bool {
        !(self.kind == CandidateKind::Computed
            && (self.value == COMPUTED_TODAY || self.value == COMPUTED_BLANK))
    }
}

/// PDF field name -> mapping value.
///
/// Many fields may share one value; unmapped fields are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(BTreeMap<String, String>);

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Parsed target for `field`, if mapped.
    pub fn target_for(&self, field: &str) -> Option<MappingTarget> {
        self.0.get(field).map(|value| MappingTarget::parse(value))
    }

    pub fn is_mapped(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Binds `field` to `target`, replacing any previous binding.
    pub fn set(&mut self, field: impl Into<String>, target: &MappingTarget) {
        self.0.insert(field.into(), target.as_key().to_string());
    }

    /// Binds `field` to a raw stored value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for FieldMapping {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
