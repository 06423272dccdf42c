//! CSV import snapshots.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::{NormalizedName, normalize};

/// Where an imported CSV came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvReference {
    /// Original filename as picked by the user.
    pub filename: String,
    /// Local copy kept by the app.
    pub stored_path: PathBuf,
    pub imported_at: DateTime<Utc>,
}

/// Headers of an imported CSV with their normalized forms.
///
/// `normalized_headers[i]` always belongs to `headers[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvImportSnapshot {
    pub reference: CsvReference,
    pub headers: Vec<String>,
    pub normalized_headers: Vec<NormalizedName>,
}

impl CsvImportSnapshot {
    /// Builds a snapshot, normalizing each header in place.
    pub fn new(reference: CsvReference, headers: Vec<String>) -> Self {
        let normalized_headers = headers.iter().map(String::as_str).map(normalize).collect();
        Self {
            reference,
            headers,
            normalized_headers,
        }
    }

    /// Header/normalized pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &NormalizedName)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.normalized_headers.iter())
    }

    /// Headers de-duplicated by string equality, first occurrence kept.
    pub fn header_options(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.headers
            .iter()
            .map(String::as_str)
            .filter(|h| seen.insert(*h))
            .collect()
    }
}
