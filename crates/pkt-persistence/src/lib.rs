//! Persistent app state for Packet Studio.
//!
//! The app's working state (recipients, CSV import, field mapping, message
//! template and delivery log) is one explicit [`AppState`]
//! value moved through a [`StateStore`]. The mapping, template and output
//! crates never touch storage.
//!
//! # File Format
//!
//! [`JsonFileStore`] writes pretty-printed JSON with a top-level
//! `schema_version`. Writes go to `<name>.json.tmp` and are renamed over the
//! target, so a crash never leaves a half-written state file. A missing file
//! loads as the default state; a file from a newer schema is rejected with
//! [`PersistenceError::UnsupportedVersion`].

mod error;
mod state;
mod store;

pub use error::{PersistenceError, Result};
pub use state::{AppState, CURRENT_SCHEMA_VERSION};
pub use store::{JsonFileStore, MemoryStore, STATE_FILE_NAME, StateStore};
