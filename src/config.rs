//! Theme settings persistence.
//!
//! The engine computes everything from two inputs: the accent color and the
//! theme mode. Only those two are persisted, as TOML under the user's config
//! directory, with a compiled-in default for first runs. Computed colors are
//! never written anywhere.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::theme::ThemeMode;

// Embedded default, used until a settings file exists
const DEFAULT_SETTINGS: &str = include_str!("../defaults/theme.toml");

/// The two persisted theme inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    pub accent_color: String,
    #[serde(default)]
    pub mode: ThemeMode,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        toml::from_str(DEFAULT_SETTINGS).unwrap_or_else(|e| {
            tracing::warn!("Embedded default theme.toml failed to parse: {e}");
            Self {
                accent_color: "#6750a4".to_string(),
                mode: ThemeMode::Auto,
            }
        })
    }
}

impl ThemeSettings {
    /// Settings file location: `<config dir>/huesafe/theme.toml`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("huesafe").join("theme.toml"))
    }

    /// Load persisted settings, falling back to the embedded defaults when
    /// no file exists yet.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings =
            toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("Could not determine config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize theme settings")?;
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Strict `#RRGGBB` check for user input headed to the settings file. The
/// engine itself tolerates a missing `#`; persisted values always carry it.
pub fn is_valid_hex_color(color: &str) -> bool {
    if !color.starts_with('#') || color.len() != 7 {
        return false;
    }
    color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
