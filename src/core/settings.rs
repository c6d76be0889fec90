//! Persisted defaults and per-run embed options
//!
//! Settings live in `<config dir>/lrcput/settings.json`. Command-line flags
//! are layered on top to produce the `EmbedOptions` for one run.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::AudioFormat;
use crate::error::{Error, Result};

/// User defaults, loaded from disk when present
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Skip audio files that already carry lyrics
    #[serde(default)]
    pub skip_existing: bool,
    /// Delete LRC files after a successful embed
    #[serde(default)]
    pub reduce_lrc: bool,
    /// Descend into subdirectories
    #[serde(default)]
    pub recursive: bool,
    /// Treat `.m4a` files as candidates
    #[serde(default = "default_true")]
    pub m4a_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            skip_existing: false,
            reduce_lrc: false,
            recursive: false,
            m4a_enabled: true,
        }
    }
}

impl Settings {
    const SETTINGS_FILE: &'static str = "settings.json";

    /// Default settings path (`~/.config/lrcput/settings.json` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lrcput").join(Self::SETTINGS_FILE))
    }

    /// Load settings from `path` (or the default location), falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => {
                log::debug!("No config directory, using default settings");
                return Self::default();
            }
        };

        match Self::try_load(&path) {
            Ok(settings) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::debug!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Settings file not found: {}",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))
    }
}

/// Options for a single embed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    pub skip_existing: bool,
    pub reduce_lrc: bool,
    pub recursive: bool,
    /// Formats Discovery selects; anything else is ignored
    pub formats: Vec<AudioFormat>,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Settings::default().into()
    }
}

impl From<Settings> for EmbedOptions {
    fn from(settings: Settings) -> Self {
        let formats = AudioFormat::ALL
            .into_iter()
            .filter(|f| settings.m4a_enabled || *f != AudioFormat::M4a)
            .collect();

        Self {
            skip_existing: settings.skip_existing,
            reduce_lrc: settings.reduce_lrc,
            recursive: settings.recursive,
            formats,
        }
    }
}

impl EmbedOptions {
    pub fn is_enabled(&self, format: AudioFormat) -> bool {
        self.formats.contains(&format)
    }
}
