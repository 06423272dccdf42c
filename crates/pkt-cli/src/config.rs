//! CLI settings, persisted as TOML.
//!
//! Settings live in the platform config folder:
//! - macOS: ~/Library/Application Support/org.packet-studio.Packet Studio/
//! - Windows: %APPDATA%/packet-studio/Packet Studio/config/
//! - Linux: ~/.config/packetstudio/
//!
//! A missing or unreadable file never fails a command: defaults are used and
//! a warning is logged.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use pkt_map::{AutoMapConfig, DEFAULT_DATE_FORMAT};
use pkt_template::TokenGrammar;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "packet-studio";
const APP_NAME: &str = "Packet Studio";
const CONFIG_FILENAME: &str = "settings.toml";

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sender: SenderSettings,
    pub render: RenderSettings,
    pub map: MapSettings,
}

/// Default sender identity for `{{sender_name}}` and `{{sender_email}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderSettings {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Token grammar for message templates.
    pub grammar: TokenGrammar,
    /// `chrono` format for `{{date}}` and computed today fields.
    pub date_format: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            grammar: TokenGrammar::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Auto-mapping thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub min_score: f64,
    pub min_margin: f64,
}

impl Default for MapSettings {
    fn default() -> Self {
        let config = AutoMapConfig::default();
        Self {
            min_score: config.min_score,
            min_margin: config.min_margin,
        }
    }
}

impl MapSettings {
    pub fn auto_map_config(&self) -> AutoMapConfig {
        AutoMapConfig {
            min_score: self.min_score,
            min_margin: self.min_margin,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Path of the default settings file.
///
/// Returns `None` if the platform-specific directory cannot be determined.
pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Default folder for the saved app state.
pub fn state_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Loads settings from `explicit`, or from [`settings_path`] when `None`.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    match explicit {
        Some(path) => load_settings_from(path),
        None => {
            let Some(path) = settings_path() else {
                tracing::warn!("Could not determine settings path, using defaults");
                return Settings::default();
            };
            load_settings_from(&path)
        }
    }
}

/// Loads settings from `path`, falling back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No settings file found at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read settings file: {}, using defaults", e);
            Settings::default()
        }
    }
}

/// Settings as TOML text.
pub fn settings_to_toml(settings: &Settings) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_round_trip() {
        let settings = Settings::default();
        let toml_str = settings_to_toml(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "[sender]\nname = \"Ms. Rivera\"\n\n[render]\ngrammar = \"extended\"\n",
        )
        .unwrap();

        let settings = load_settings(Some(&path));
        assert_eq!(settings.sender.name, "Ms. Rivera");
        assert_eq!(settings.render.grammar, TokenGrammar::Extended);
        assert_eq!(settings.render.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(settings.map.auto_map_config(), AutoMapConfig::default());
    }

    #[test]
    fn test_unparsable_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render\ngrammar = 5").unwrap();
        assert_eq!(load_settings(Some(&path)), Settings::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(
            load_settings(Some(&dir.path().join("absent.toml"))),
            Settings::default()
        );
    }
}
