//! User configuration.
//!
//! One small JSON document at the per-user config location
//! (`~/.config/twdict/config.json` on Linux), read once at startup and
//! passed into the presenter. A missing file or key simply disables the
//! optional behavior it controls.

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories_next::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Shell command prefix used to play the pronunciation clip; the
    /// resolved audio URL is appended as the sole trailing argument.
    /// Absent means no audio playback.
    pub player_cmd: Option<String>,
}

impl Config {
    /// Load the config file, falling back to defaults when it is
    /// missing or unreadable. An unreadable file is worth a warning; a
    /// missing one is the normal case.
    pub fn load() -> Config {
        let Some(path) = Config::path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }

        match Config::read(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), err = %err, "Ignoring unreadable config file");
                Config::default()
            }
        }
    }

    fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "twdict").map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn read(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }
}
