//! Candidate scoring for field auto-mapping.
//!
//! Uses Jaccard similarity over normalized token sets as the base score,
//! with additive adjustments for matching hints, canonical built-in
//! pairings, and computed sentinels.

use std::collections::BTreeSet;

use pkt_model::{
    COMPUTED_INITIALS, COMPUTED_TODAY, CandidateKind, FieldHint, MappingCandidate, NormalizedName,
};
/// Boost when field and candidate share a known hint.
pub const HINT_MATCH_BOOST: f64 = 0.35;
/// Further boost for a canonical (hint, built-in key) pair.
pub const CANONICAL_PAIR_BOOST: f64 = 0.25;
/// Boost for the initials sentinel on an initials field.
pub const INITIALS_SENTINEL_BOOST: f64 = 0.20;
/// Penalty for the today sentinel on a date field.
pub const TODAY_ON_DATE_PENALTY: f64 = 0.05;
/// Penalty for any computed candidate on a non-initials field.
pub const COMPUTED_PENALTY: f64 = 0.05;
/// Upper bound of a final score.
pub const MAX_SCORE: f64 = 2.0;

/// A component contributing to the final score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    /// Component name (e.g., "Token overlap").
    pub name: &'static str,
    /// Component value (negative for penalties).
    pub value: f64,
    /// Human-readable description.
    pub description: String,
}

/// Score of one candidate against one field.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Candidate value that would be stored in the mapping.
    pub value: String,
    /// Final score in `[0, MAX_SCORE]`.
    pub score: f64,
    /// Breakdown of score components for explainability.
    pub explanation: Vec<ScoreComponent>,
}

impl CandidateScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        self.explanation
            .iter()
            .map(|c| format!("{}: {:+.2}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// `|A ∩ B| / |A ∪ B|`; zero when both sets are empty.
pub fn jaccard(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Scores `candidate` against `field`.
///
/// Returns `None` for candidates that may never be auto-assigned and for
/// candidates with no token overlap at all.
pub fn score_candidate(
    field: &NormalizedName,
    candidate: &MappingCandidate,
) -> Option<CandidateScore> {
    if !candidate.is_auto_mappable() {
        return None;
    }

    let base = jaccard(&field.token_set(), &candidate.normalized.token_set());
    if base == 0.0 {
        return None;
    }

    let mut components = vec![ScoreComponent {
        name: "Token overlap",
        value: base,
        description: format!(
            "'{}' vs '{}'",
            field.tokens.join(" "),
            candidate.normalized.tokens.join(" ")
        ),
    }];
    let mut score = base;
    let mut adjust = |name: &'static str, value: f64, description: String| {
        score += value;
        components.push(ScoreComponent {
            name,
            value,
            description,
        });
    };

    if field.hint.is_known() && field.hint == candidate.normalized.hint {
        adjust(
            "Hint match",
            HINT_MATCH_BOOST,
            format!("both look like {}", field.hint.label()),
        );
    }
    if is_canonical_pair(field.hint, &candidate.value) {
        adjust(
            "Canonical property",
            CANONICAL_PAIR_BOOST,
            format!("{} is the built-in {}", candidate.value, field.hint.label()),
        );
    }
    if field.hint == FieldHint::Date && candidate.value == COMPUTED_TODAY {
        adjust(
            "Prefer date column",
            -TODAY_ON_DATE_PENALTY,
            "date fields prefer real data over today's date".to_string(),
        );
    }
    if field.hint == FieldHint::Initials && candidate.value == COMPUTED_INITIALS {
        adjust(
            "Initials sentinel",
            INITIALS_SENTINEL_BOOST,
            "initials are computed from the recipient name".to_string(),
        );
    }
    if candidate.kind == CandidateKind::Computed && field.hint != FieldHint::Initials {
        adjust(
            "Computed value",
            -COMPUTED_PENALTY,
            format!("{} is a computed value", candidate.label),
        );
    }

    Some(CandidateScore {
        value: candidate.value.clone(),
        score: score.clamp(0.0, MAX_SCORE),
        explanation: components,
    })
}

fn is_canonical_pair(hint: FieldHint, value: &str) -> bool {
    matches!(
        (hint, value),
        (FieldHint::FirstName, "FirstName")
            | (FieldHint::LastName, "LastName")
            | (FieldHint::FullName, "FullName")
            | (FieldHint::Email, "Email")
            | (FieldHint::Phone, "PhoneNumber")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkt_model::{BuiltInProperty, MappingTarget, normalize};

    #[test]
    fn test_jaccard() {
        let a: BTreeSet<&str> = ["first", "name"].into_iter().collect();
        let b: BTreeSet<&str> = ["name"].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_canonical_builtin_scores_highest() {
        let field = normalize("First Name");
        let builtin = MappingCandidate::built_in(BuiltInProperty::FirstName);
        let header = MappingCandidate::csv_header("First Name");

        let builtin_score = score_candidate(&field, &builtin).unwrap();
        let header_score = score_candidate(&field, &header).unwrap();
        assert!((builtin_score.score - 1.6).abs() < 1e-9);
        assert!((header_score.score - 1.35).abs() < 1e-9);
    }

    #[test]
    fn test_no_overlap_excluded() {
        let field = normalize("Parent Email");
        let candidate = MappingCandidate::csv_header("Grade");
        assert!(score_candidate(&field, &candidate).is_none());
    }

    #[test]
    fn test_today_sentinel_not_eligible() {
        let field = normalize("Date");
        let today = MappingCandidate::computed(&MappingTarget::ComputedToday);
        assert!(score_candidate(&field, &today).is_none());
    }

    #[test]
    fn test_initials_sentinel_boost() {
        let field = normalize("Initials");
        let initials = MappingCandidate::computed(&MappingTarget::ComputedInitials);
        let score = score_candidate(&field, &initials).unwrap();
        assert!((score.score - 1.55).abs() < 1e-9);
        assert!(score.explain().contains("Initials sentinel"));
    }

    #[test]
    fn test_computed_penalty_outside_initials() {
        let field = normalize("Initials Date");
        // Field hint is Initials, so no penalty applies here.
        let initials = MappingCandidate::computed(&MappingTarget::ComputedInitials);
        let with_hint = score_candidate(&field, &initials).unwrap();
        assert!(with_hint.explanation.iter().all(|c| c.name != "Computed value"));
    }
}
