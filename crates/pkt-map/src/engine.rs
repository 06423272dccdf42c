//! Conservative auto-mapping engine.
//!
//! Suggests at most one target per PDF field and prefers leaving a field
//! unmapped over guessing: signature fields are never touched, weak scores
//! are rejected, and near-ties between the two best candidates are treated
//! as ambiguous.

use std::cmp::Ordering;

use pkt_model::{
    FieldHint, FieldMapping, MappingCandidate, NormalizedName, PdfField, PdfFieldType,
};
use serde::Serialize;

use crate::score::{CandidateScore, score_candidate};

/// Tolerance for floating point noise in the margin check.
const SCORE_EPSILON: f64 = 1e-9;

/// Acceptance thresholds for a suggestion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoMapConfig {
    /// Minimum score of the best candidate (default: 0.90).
    pub min_score: f64,
    /// Minimum lead of the best candidate over the runner-up (default: 0.15).
    pub min_margin: f64,
}

impl Default for AutoMapConfig {
    fn default() -> Self {
        Self {
            min_score: 0.90,
            min_margin: 0.15,
        }
    }
}

/// Outcome of one auto-map pass over a field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappingReport {
    /// Fields newly mapped in this pass, with the stored value.
    pub mapped: Vec<(String, String)>,
    /// Fields that already had a mapping and were left alone.
    pub preserved: Vec<String>,
    /// Fields left without a mapping.
    pub unmapped: Vec<String>,
    /// Signature fields; never auto-mapped.
    pub signature_fields: Vec<String>,
}

impl MappingReport {
    /// Number of fields newly mapped.
    pub fn mapped_count(&self) -> usize {
        self.mapped.len()
    }
}

/// Scores candidates and applies the acceptance policy.
#[derive(Debug, Clone, Default)]
pub struct AutoMapper {
    config: AutoMapConfig,
}

impl AutoMapper {
    pub fn new(config: AutoMapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AutoMapConfig {
        &self.config
    }

    /// All eligible candidates with a non-zero score, best first.
    ///
    /// Equal scores keep candidate order.
    pub fn rank(
        &self,
        field: &NormalizedName,
        candidates: &[MappingCandidate],
    ) -> Vec<CandidateScore> {
        let mut scores: Vec<CandidateScore> = candidates
            .iter()
            .filter_map(|candidate| score_candidate(field, candidate))
            .collect();
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scores
    }

    /// Suggests a mapping value for one field, or `None` when the evidence
    /// is weak or ambiguous.
    pub fn suggest(
        &self,
        field: &NormalizedName,
        candidates: &[MappingCandidate],
    ) -> Option<String> {
        if field.hint == FieldHint::Signature {
            return None;
        }
        if field.hint == FieldHint::Unknown && field.tokens.len() <= 1 {
            return None;
        }

        let ranked = self.rank(field, candidates);
        let best = ranked.first()?;
        if best.score < self.config.min_score {
            tracing::trace!(
                field = %field.original,
                best = %best.value,
                score = best.score,
                "best candidate below threshold"
            );
            return None;
        }
        if let Some(second) = ranked.get(1)
            && best.score - second.score + SCORE_EPSILON < self.config.min_margin
        {
            tracing::trace!(
                field = %field.original,
                best = %best.value,
                runner_up = %second.value,
                margin = best.score - second.score,
                "ambiguous candidates"
            );
            return None;
        }

        tracing::trace!(
            field = %field.original,
            value = %best.value,
            score = best.score,
            explanation = %best.explain(),
            "suggested mapping"
        );
        Some(best.value.clone())
    }

    /// Suggests mappings for every unmapped field and stores them in
    /// `mapping`.
    ///
    /// Existing entries are never overwritten, so running the pass twice
    /// changes nothing the second time.
    pub fn auto_map(
        &self,
        fields: &[PdfField],
        candidates: &[MappingCandidate],
        mapping: &mut FieldMapping,
    ) -> MappingReport {
        let mut report = MappingReport::default();

        for field in fields {
            if mapping.is_mapped(&field.name) {
                report.preserved.push(field.name.clone());
                continue;
            }
            if field.field_type == PdfFieldType::Signature
                || field.normalized.hint == FieldHint::Signature
            {
                report.signature_fields.push(field.name.clone());
                continue;
            }
            match self.suggest(&field.normalized, candidates) {
                Some(value) => {
                    mapping.insert(field.name.clone(), value.clone());
                    report.mapped.push((field.name.clone(), value));
                }
                None => report.unmapped.push(field.name.clone()),
            }
        }

        tracing::debug!(
            fields = fields.len(),
            mapped = report.mapped.len(),
            preserved = report.preserved.len(),
            unmapped = report.unmapped.len(),
            signatures = report.signature_fields.len(),
            "auto-map pass complete"
        );
        report
    }
}

/// Suggests a value with the default thresholds.
pub fn suggest(field: &NormalizedName, candidates: &[MappingCandidate]) -> Option<String> {
    AutoMapper::default().suggest(field, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::build_candidates;
    use pkt_model::normalize;

    #[test]
    fn test_suggest_builtin() {
        let candidates = build_candidates(&["Grade"]);
        assert_eq!(
            suggest(&normalize("First Name"), &candidates).as_deref(),
            Some("FirstName")
        );
        assert_eq!(
            suggest(&normalize("Email Address"), &candidates).as_deref(),
            Some("Email")
        );
    }

    #[test]
    fn test_single_unknown_token_rejected() {
        let candidates = build_candidates(&["Grade"]);
        assert_eq!(suggest(&normalize("Grade"), &candidates), None);
    }

    #[test]
    fn test_signature_rejected() {
        let candidates = build_candidates(&["Signature", "Parent Signature"]);
        assert_eq!(suggest(&normalize("Parent Signature"), &candidates), None);
    }

    #[test]
    fn test_threshold() {
        // "Parent Room" vs "Room Number": jaccard 1/3, no hint.
        let candidates = build_candidates(&["Room Number"]);
        assert_eq!(suggest(&normalize("Parent Room"), &candidates), None);

        let lenient = AutoMapper::new(AutoMapConfig {
            min_score: 0.2,
            min_margin: 0.15,
        });
        assert_eq!(
            lenient
                .suggest(&normalize("Parent Room"), &candidates)
                .as_deref(),
            Some("Room Number")
        );
    }

    #[test]
    fn test_rank_is_sorted() {
        let candidates = build_candidates(&["First Name"]);
        let ranked = AutoMapper::default().rank(&normalize("FirstName"), &candidates);
        assert_eq!(ranked[0].value, "FirstName");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
