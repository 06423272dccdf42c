//! Packet Studio data model.
//!
//! Plain value types shared by the ingest, mapping, template and output
//! crates, plus the two pure functions everything else builds on:
//!
//! - [`normalize`]: tokenizes and classifies a field or header name
//! - [`Recipient::value_for_key`]: resolves a lookup key against a recipient

pub mod field;
pub mod log;
pub mod mapping;
pub mod normalize;
pub mod recipient;
pub mod snapshot;
pub mod template;

pub use field::{PdfField, PdfFieldType};
pub use log::{DeliveryMethod, LogEntry};
pub use mapping::{
    COMPUTED_BLANK, COMPUTED_INITIALS, COMPUTED_TODAY, CandidateKind, FieldMapping,
    MappingCandidate, MappingTarget, is_computed_key,
};
pub use normalize::{FieldHint, NormalizedName, normalize};
pub use recipient::{BuiltInProperty, Recipient, RecipientSource};
pub use snapshot::{CsvImportSnapshot, CsvReference};
pub use template::MessageTemplate;
