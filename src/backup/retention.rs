//! Retention manager for dayone-backup
//!
//! Keeps the backup root within the configured number of backups and creates
//! the timestamped folder for the current run. Backup folders are named
//! `YYYYMMDD_HHMMSS`, so a lexical sort of the names is chronological.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::housekeeping::is_housekeeping;
use crate::error::{BackupError, BackupResult};

/// Folder name format of a backup instance
pub const INSTANCE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A freshly created, empty backup instance
#[derive(Debug, Clone)]
pub struct PreparedInstance {
    /// Full path to the new instance directory
    pub path: PathBuf,
    /// Old backups removed to make room, oldest first
    pub deleted: Vec<PathBuf>,
}

/// Manages backup rotation under a single backup root
pub struct RetentionManager {
    /// `<destination>/<dir_name>`
    backup_root: PathBuf,
    /// Maximum backups kept, including the new one
    max_backups: u32,
}

impl RetentionManager {
    /// Create a new RetentionManager for `destination/dir_name`
    pub fn new(destination: &Path, dir_name: &str, max_backups: u32) -> Self {
        Self {
            backup_root: destination.join(dir_name),
            max_backups,
        }
    }

    /// Get the backup root path
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Rotate old backups and create an instance stamped with `now`
    ///
    /// Old backups are deleted before the new folder is created, leaving
    /// exactly one free slot. A failed deletion aborts the run. An instance
    /// name that is already taken fails before anything is deleted.
    pub fn prepare_at(&self, now: NaiveDateTime) -> BackupResult<PreparedInstance> {
        let path = self.backup_root.join(now.format(INSTANCE_FORMAT).to_string());
        if path.exists() {
            return Err(BackupError::InstanceExists(path));
        }

        let deleted = if self.backup_root.exists() {
            self.enforce_retention()?
        } else {
            Vec::new()
        };

        fs::create_dir_all(&self.backup_root).map_err(|e| {
            BackupError::Io(format!(
                "Failed to create backup root {}: {}",
                self.backup_root.display(),
                e
            ))
        })?;

        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(BackupError::InstanceExists(path));
            }
            Err(e) => {
                return Err(BackupError::Io(format!(
                    "Failed to create backup directory {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        info!(path = %path.display(), "backup instance created");
        Ok(PreparedInstance { path, deleted })
    }

    /// List existing backups, oldest first
    ///
    /// Housekeeping entries are not backups and never show up here.
    pub fn list_backups(&self) -> BackupResult<Vec<PathBuf>> {
        if !self.backup_root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backup_root).map_err(|e| {
            BackupError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                BackupError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let name = entry.file_name();
            if is_housekeeping(&name) {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names
            .into_iter()
            .map(|name| self.backup_root.join(name))
            .collect())
    }

    /// Delete the oldest backups so one more fits within the limit
    fn enforce_retention(&self) -> BackupResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let targets = deletion_count(backups.len(), self.max_backups);
        debug!(
            existing = backups.len(),
            max = self.max_backups,
            targets,
            "checking retention"
        );

        let mut deleted = Vec::with_capacity(targets);
        for target in backups.into_iter().take(targets) {
            remove_backup(&target)?;
            info!(path = %target.display(), "old backup deleted");
            deleted.push(target);
        }

        Ok(deleted)
    }
}

/// Number of oldest backups to delete before adding one more
///
/// With `existing >= max` this is `existing - max + 1`, otherwise zero.
pub fn deletion_count(existing: usize, max_backups: u32) -> usize {
    let max = max_backups as usize;
    if existing >= max {
        existing - max + 1
    } else {
        0
    }
}

fn remove_backup(path: &Path) -> BackupResult<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| {
        BackupError::Io(format!(
            "Failed to delete old backup {}: {}",
            path.display(),
            e
        ))
    })
}
