//! Field auto-mapping for Packet Studio.
//!
//! - [`candidates`]: the list of targets a PDF field can be mapped to
//! - [`score`]: token-overlap scoring with hint adjustments
//! - [`engine`]: the conservative [`AutoMapper`]
//! - [`resolve`]: concrete per-recipient values for a finished mapping

pub mod candidates;
pub mod engine;
pub mod resolve;
pub mod score;

pub use candidates::{
    COMPUTED_TARGETS, build_candidates, built_in_candidates, computed_candidates,
};
pub use engine::{AutoMapConfig, AutoMapper, MappingReport, suggest};
pub use resolve::{DEFAULT_DATE_FORMAT, ResolveContext, resolve_field_values, resolve_target};
pub use score::{CandidateScore, ScoreComponent, jaccard, score_candidate};
