//! Path management for dayone-backup
//!
//! Resolves where the Day One application keeps its live data.
//!
//! ## Path Resolution Order
//!
//! 1. `DAYONE_BACKUP_SOURCE_DIR` environment variable (if set)
//! 2. `~/Library/Group Containers/5U8NS4GX82.dayoneapp2`

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::BackupError;

/// Environment variable overriding the Day One data directory
pub const SOURCE_DIR_ENV: &str = "DAYONE_BACKUP_SOURCE_DIR";

/// Group container of the Day One app, relative to the home directory
const GROUP_CONTAINER: &str = "Library/Group Containers/5U8NS4GX82.dayoneapp2";

/// Name of the photo directory, both in the source and in each backup
pub const PHOTOS_DIR_NAME: &str = "DayOnePhotos";

/// Primary journal database file
pub const DATABASE_FILE: &str = "DayOne.sqlite";

/// Database artifacts copied verbatim into every backup, in copy order
pub const DATABASE_FILES: [&str; 4] = [
    "DayOne.sqlite",
    "DayOne.sqlite-shm",
    "DayOne.sqlite-wal",
    "DayOne.sqlite.dayonelock",
];

/// Locations of the Day One source data
#[derive(Debug, Clone)]
pub struct DayOnePaths {
    /// The app's group container directory
    data_dir: PathBuf,
}

impl DayOnePaths {
    /// Create a new DayOnePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, BackupError> {
        let data_dir = if let Ok(custom) = std::env::var(SOURCE_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { data_dir })
    }

    /// Create DayOnePaths rooted at a custom data directory (useful for testing)
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Get the data directory (the app's group container)
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the documents directory holding the database files
    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join("Data").join("Documents")
    }

    /// Get the photo library directory
    pub fn photos_dir(&self) -> PathBuf {
        self.documents_dir().join(PHOTOS_DIR_NAME)
    }

    /// Get the path to the live journal database
    pub fn database_file(&self) -> PathBuf {
        self.documents_dir().join(DATABASE_FILE)
    }
}

fn resolve_default_path() -> Result<PathBuf, BackupError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BackupError::Config("Could not determine home directory".into()))?;
    Ok(dirs.home_dir().join(GROUP_CONTAINER))
}
