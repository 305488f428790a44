//! User settings for dayone-backup
//!
//! Defaults for the backup folder name and retention count. Values come from
//! an optional JSON settings file and are overridden by command-line flags.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::BackupError;

/// Environment variable pointing at an explicit settings file
pub const CONFIG_FILE_ENV: &str = "DAYONE_BACKUP_CONFIG";

/// Default folder created under the destination
pub const DEFAULT_DIR_NAME: &str = "Dayone2Backup";

/// Default number of backups kept
pub const DEFAULT_MAX_BACKUPS: u32 = 5;

/// User settings for dayone-backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder under the destination holding all backups
    #[serde(default = "default_dir_name")]
    pub dir_name: String,

    /// Maximum number of backups kept after a run
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

fn default_dir_name() -> String {
    DEFAULT_DIR_NAME.to_string()
}

fn default_max_backups() -> u32 {
    DEFAULT_MAX_BACKUPS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dir_name: default_dir_name(),
            max_backups: default_max_backups(),
        }
    }
}

impl Settings {
    /// Resolve the settings file location
    ///
    /// `DAYONE_BACKUP_CONFIG` wins, otherwise `config.json` in the platform
    /// config directory. Returns `None` when neither can be determined.
    pub fn default_file() -> Option<PathBuf> {
        if let Ok(custom) = std::env::var(CONFIG_FILE_ENV) {
            return Some(PathBuf::from(custom));
        }
        ProjectDirs::from("", "", "dayone-backup").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, BackupError> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Settings::default());
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| BackupError::Config(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            BackupError::Config(format!(
                "Failed to parse settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides on top of these settings
    pub fn with_overrides(mut self, dir_name: Option<String>, max_backups: Option<u32>) -> Self {
        if let Some(name) = dir_name {
            self.dir_name = name;
        }
        if let Some(max) = max_backups {
            self.max_backups = max;
        }
        self
    }

    /// Check that the settings describe a usable retention policy
    pub fn validate(&self) -> Result<(), BackupError> {
        if self.max_backups < 1 {
            return Err(BackupError::Config(
                "max_backups must be at least 1".into(),
            ));
        }
        if self.dir_name.trim().is_empty() || self.dir_name.contains(['/', '\\']) {
            return Err(BackupError::Config(format!(
                "dir_name must be a single folder name, got '{}'",
                self.dir_name
            )));
        }
        Ok(())
    }
}
