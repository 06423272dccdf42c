//! Candidate list construction.

use std::collections::BTreeSet;

use pkt_model::{BuiltInProperty, MappingCandidate, MappingTarget};

/// Computed sentinels, in display order.
pub const COMPUTED_TARGETS: [MappingTarget; 3] = [
    MappingTarget::ComputedToday,
    MappingTarget::ComputedInitials,
    MappingTarget::ComputedBlank,
];

/// Candidates for the built-in recipient properties.
pub fn built_in_candidates() -> Vec<MappingCandidate> {
    BuiltInProperty::ALL
        .iter()
        .copied()
        .map(MappingCandidate::built_in)
        .collect()
}

/// Candidates for the computed sentinels.
pub fn computed_candidates() -> Vec<MappingCandidate> {
    COMPUTED_TARGETS.iter().map(MappingCandidate::computed).collect()
}

/// Full candidate list: built-ins, then computed values, then CSV headers.
///
/// Headers keep their original text and first-seen order. Duplicates,
/// blanks, and headers spelled exactly like a built-in key are skipped,
/// since their stored value would be indistinguishable from the built-in.
pub fn build_candidates<S: AsRef<str>>(headers: &[S]) -> Vec<MappingCandidate> {
    let mut candidates = built_in_candidates();
    candidates.extend(computed_candidates());

    let mut seen = BTreeSet::new();
    for header in headers {
        let header = header.as_ref();
        if header.trim().is_empty() || BuiltInProperty::from_key(header).is_some() {
            continue;
        }
        if seen.insert(header) {
            candidates.push(MappingCandidate::csv_header(header));
        }
    }
    candidates
}
