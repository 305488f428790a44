//! Backup system for dayone-backup
//!
//! Snapshots the Day One database and photo library into a timestamped
//! folder under a backup root, keeping only a fixed number of snapshots.
//!
//! # Architecture
//!
//! The pipeline runs these stages strictly in order, each finishing before
//! the next begins:
//!
//! - `RetentionManager`: deletes the oldest snapshots and creates the new folder
//! - `FileCopier`: copies the database artifacts and the photo tree
//! - `Archiver`: packs the copied photos into `DayOnePhotos.tar.gz`
//! - `JournalDb`: reads the newest entries back out of the copied database
//!
//! A failure stops the run where it happened. Nothing already written is
//! rolled back.
//!
//! # Backup Layout
//!
//! ```text
//! <dest>/<dir_name>/<YYYYMMDD_HHMMSS>/
//!     DayOne.sqlite
//!     DayOne.sqlite-shm
//!     DayOne.sqlite-wal
//!     DayOne.sqlite.dayonelock
//!     DayOnePhotos.tar.gz
//! ```

mod archiver;
mod copier;
mod housekeeping;
mod retention;

use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDateTime};
use tracing::info;

pub use archiver::{ArchiveInfo, Archiver};
pub use copier::{copy_tree, CopyReport, FileCopier};
pub use housekeeping::{is_housekeeping, DS_STORE};
pub use retention::{deletion_count, PreparedInstance, RetentionManager, INSTANCE_FORMAT};

use crate::config::paths::{DayOnePaths, DATABASE_FILE};
use crate::config::settings::Settings;
use crate::error::BackupResult;
use crate::journal::{JournalDb, JournalEntry, PREVIEW_LIMIT};

/// Progress notifications emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    PreparingDestination,
    OldBackupDeleted(PathBuf),
    InstanceCreated(PathBuf),
    CopyingFiles,
    FilesCopied(CopyReport),
    Compressing(PathBuf),
    Archived(ArchiveInfo),
    LoadingEntries(PathBuf),
}

/// Everything a completed run produced
#[derive(Debug, Clone)]
pub struct BackupOutcome {
    /// The new backup instance
    pub instance: PathBuf,
    /// Old instances removed by rotation
    pub deleted: Vec<PathBuf>,
    /// Files copied into the instance
    pub copied: CopyReport,
    /// The photo archive
    pub archive: ArchiveInfo,
    /// Newest journal entries, empty when the preview was skipped
    pub entries: Vec<JournalEntry>,
}

/// Drives one backup run from rotation to preview
pub struct BackupPipeline {
    paths: DayOnePaths,
    destination: PathBuf,
    settings: Settings,
    archiver: Archiver,
    preview: bool,
}

impl BackupPipeline {
    /// Create a pipeline backing up `paths` into `destination`
    pub fn new(paths: DayOnePaths, destination: PathBuf, settings: Settings) -> Self {
        Self {
            paths,
            destination,
            settings,
            archiver: Archiver::default(),
            preview: true,
        }
    }

    /// Enable or disable reading entries back after the backup
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Run the pipeline stamped with the current local time
    pub fn run(&self, on_event: &mut dyn FnMut(PipelineEvent)) -> BackupResult<BackupOutcome> {
        self.run_at(Local::now().naive_local(), on_event)
    }

    /// Run the pipeline stamped with `now`
    pub fn run_at(
        &self,
        now: NaiveDateTime,
        on_event: &mut dyn FnMut(PipelineEvent),
    ) -> BackupResult<BackupOutcome> {
        on_event(PipelineEvent::PreparingDestination);
        let retention = RetentionManager::new(
            &self.destination,
            &self.settings.dir_name,
            self.settings.max_backups,
        );
        let prepared = retention.prepare_at(now)?;
        for deleted in &prepared.deleted {
            on_event(PipelineEvent::OldBackupDeleted(deleted.clone()));
        }
        on_event(PipelineEvent::InstanceCreated(prepared.path.clone()));

        on_event(PipelineEvent::CopyingFiles);
        let (copied, photos) = FileCopier::new(&self.paths).copy_all(&prepared.path)?;
        on_event(PipelineEvent::FilesCopied(copied.clone()));

        on_event(PipelineEvent::Compressing(photos.clone()));
        let archive = self.archiver.compress_and_remove(&photos)?;
        on_event(PipelineEvent::Archived(archive.clone()));

        let entries = if self.preview {
            let db_path = prepared.path.join(DATABASE_FILE);
            on_event(PipelineEvent::LoadingEntries(db_path.clone()));
            JournalDb::open(&db_path)?.latest_entries(now.year(), PREVIEW_LIMIT)?
        } else {
            Vec::new()
        };

        info!(instance = %prepared.path.display(), "backup complete");
        Ok(BackupOutcome {
            instance: prepared.path,
            deleted: prepared.deleted,
            copied,
            archive,
            entries,
        })
    }
}
