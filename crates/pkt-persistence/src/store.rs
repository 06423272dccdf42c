//! State storage: the [`StateStore`] port and its implementations.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PersistenceError, Result};
use crate::state::{AppState, CURRENT_SCHEMA_VERSION};

/// File name used inside a state directory.
pub const STATE_FILE_NAME: &str = "state.json";

/// Loads and saves [`AppState`].
pub trait StateStore {
    /// Loads the saved state, or a fresh default when nothing is saved yet.
    fn load(&self) -> Result<AppState>;

    /// Saves `state`, replacing whatever was stored before.
    fn save(&mut self, state: &AppState) -> Result<()>;
}

/// Stores state as pretty-printed JSON in a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for [`STATE_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(STATE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no saved state, starting fresh");
            return Ok(AppState::default());
        }
        let bytes = fs::read(&self.path).map_err(|e| PersistenceError::Io {
            operation: "read",
            path: self.path.clone(),
            source: e,
        })?;
        let state = parse_state_bytes(&bytes, &self.path)?;
        tracing::info!("Loaded state from {}", self.path.display());
        Ok(state)
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        let mut state = state.clone();
        state.schema_version = CURRENT_SCHEMA_VERSION;
        state.touch();
        let bytes = serde_json::to_vec_pretty(&state).map_err(|e| {
            PersistenceError::Serialization {
                source: Box::new(e),
            }
        })?;
        write_atomic(&self.path, &bytes)?;
        tracing::info!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// Keeps state in memory. Useful for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<AppState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `state`.
    pub fn with_state(state: AppState) -> Self {
        Self { state: Some(state) }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<AppState> {
        Ok(self.state.clone().unwrap_or_default())
    }

    fn save(&mut self, state: &AppState) -> Result<()> {
        self.state = Some(state.clone());
        Ok(())
    }
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    schema_version: u32,
}

/// Checks the schema version before deserializing the full state, so a file
/// from a newer build reports a version error rather than a parse error.
fn parse_state_bytes(bytes: &[u8], path: &Path) -> Result<AppState> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("not JSON ({e})"),
        })?;
    if !value.is_object() {
        return Err(PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "top level is not an object".to_string(),
        });
    }

    let probe: VersionProbe =
        serde_json::from_value(value.clone()).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("bad schema_version ({e})"),
        })?;
    if probe.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: probe.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    serde_json::from_value(value).map_err(|e| PersistenceError::Deserialization {
        source: Box::new(e),
    })
}

/// Writes to a temp file first, then renames for atomicity.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })
}
