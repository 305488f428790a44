//! File copier for dayone-backup
//!
//! Populates an empty backup instance with a byte-for-byte snapshot of the
//! Day One database artifacts and its photo library.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use super::housekeeping::is_housekeeping;
use crate::config::paths::{DayOnePaths, DATABASE_FILES, PHOTOS_DIR_NAME};
use crate::error::{BackupError, BackupResult};

/// What a copy pass wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Number of regular files copied
    pub files: u64,
    /// Total bytes copied
    pub bytes: u64,
}

impl CopyReport {
    fn add(&mut self, bytes: u64) {
        self.files += 1;
        self.bytes += bytes;
    }
}

/// Copies Day One source files into a backup instance
pub struct FileCopier<'a> {
    paths: &'a DayOnePaths,
}

impl<'a> FileCopier<'a> {
    /// Create a new FileCopier reading from `paths`
    pub fn new(paths: &'a DayOnePaths) -> Self {
        Self { paths }
    }

    /// Copy the database files, then the photo library, into `instance`
    ///
    /// Returns the report together with the path of the copied photo directory.
    pub fn copy_all(&self, instance: &Path) -> BackupResult<(CopyReport, PathBuf)> {
        let mut report = self.copy_database_files(instance)?;
        let photos = instance.join(PHOTOS_DIR_NAME);
        let photo_report = self.copy_photos(&photos)?;
        report.files += photo_report.files;
        report.bytes += photo_report.bytes;
        Ok((report, photos))
    }

    /// Copy every database artifact into `instance` under the same name
    ///
    /// Every artifact is required; a missing one aborts the run.
    pub fn copy_database_files(&self, instance: &Path) -> BackupResult<CopyReport> {
        let documents = self.paths.documents_dir();
        let mut report = CopyReport::default();

        for name in DATABASE_FILES {
            let from = documents.join(name);
            let to = instance.join(name);
            if !from.is_file() {
                return Err(BackupError::MissingSource(from));
            }

            debug!(from = %from.display(), to = %to.display(), "copying database file");
            let bytes = fs::copy(&from, &to).map_err(|e| {
                BackupError::Io(format!("Failed to copy {}: {}", from.display(), e))
            })?;
            report.add(bytes);
        }

        info!(files = report.files, bytes = report.bytes, "database files copied");
        Ok(report)
    }

    /// Recursively copy the photo library to `dest`
    ///
    /// Housekeeping entries are skipped at every level.
    pub fn copy_photos(&self, dest: &Path) -> BackupResult<CopyReport> {
        let source = self.paths.photos_dir();
        if !source.is_dir() {
            return Err(BackupError::MissingSource(source));
        }

        let report = copy_tree(&source, dest)?;
        info!(files = report.files, bytes = report.bytes, "photo files copied");
        Ok(report)
    }
}

/// Copy a directory tree, leaving out housekeeping entries
pub fn copy_tree(source: &Path, dest: &Path) -> BackupResult<CopyReport> {
    let mut report = CopyReport::default();

    let walker = WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_housekeeping(e.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            BackupError::Io(format!("Failed to walk {}: {}", source.display(), e))
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| BackupError::Io(format!("Unexpected path in photo tree: {}", e)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                BackupError::Io(format!(
                    "Failed to create directory {}: {}",
                    target.display(),
                    e
                ))
            })?;
        } else {
            let bytes = fs::copy(entry.path(), &target).map_err(|e| {
                BackupError::Io(format!(
                    "Failed to copy {}: {}",
                    entry.path().display(),
                    e
                ))
            })?;
            report.add(bytes);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_source(root: &Path) -> DayOnePaths {
        let paths = DayOnePaths::with_data_dir(root.to_path_buf());
        let documents = paths.documents_dir();
        fs::create_dir_all(&documents).unwrap();
        for name in DATABASE_FILES {
            fs::write(documents.join(name), format!("contents of {}", name)).unwrap();
        }

        let photos = paths.photos_dir();
        fs::create_dir_all(photos.join("2026").join("03")).unwrap();
        fs::write(photos.join("a.jpeg"), b"\xff\xd8jpeg-a").unwrap();
        fs::write(photos.join("2026").join("03").join("b.heic"), b"heic-b").unwrap();
        fs::write(photos.join(".DS_Store"), b"finder").unwrap();
        fs::write(photos.join("2026").join(".DS_Store"), b"finder").unwrap();
        paths
    }

    #[test]
    fn test_copies_database_files_verbatim() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let paths = seed_source(source.path());

        let report = FileCopier::new(&paths)
            .copy_database_files(dest.path())
            .unwrap();

        assert_eq!(report.files, 4);
        for name in DATABASE_FILES {
            let copied = fs::read_to_string(dest.path().join(name)).unwrap();
            assert_eq!(copied, format!("contents of {}", name));
        }
    }

    #[test]
    fn test_missing_database_file_is_fatal() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let paths = seed_source(source.path());
        fs::remove_file(paths.documents_dir().join("DayOne.sqlite-wal")).unwrap();

        let err = FileCopier::new(&paths)
            .copy_database_files(dest.path())
            .unwrap_err();

        match err {
            BackupError::MissingSource(path) => assert!(path.ends_with("DayOne.sqlite-wal")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_photo_tree_skips_housekeeping() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let paths = seed_source(source.path());
        let target = dest.path().join(PHOTOS_DIR_NAME);

        let report = FileCopier::new(&paths).copy_photos(&target).unwrap();

        assert_eq!(report.files, 2);
        assert_eq!(fs::read(target.join("a.jpeg")).unwrap(), b"\xff\xd8jpeg-a");
        assert_eq!(
            fs::read(target.join("2026").join("03").join("b.heic")).unwrap(),
            b"heic-b"
        );
        assert!(!target.join(".DS_Store").exists());
        assert!(!target.join("2026").join(".DS_Store").exists());
    }

    #[test]
    fn test_empty_photo_dir_is_copied() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let paths = DayOnePaths::with_data_dir(source.path().to_path_buf());
        fs::create_dir_all(paths.photos_dir()).unwrap();
        let target = dest.path().join(PHOTOS_DIR_NAME);

        let report = FileCopier::new(&paths).copy_photos(&target).unwrap();

        assert_eq!(report, CopyReport::default());
        assert!(target.is_dir());
    }

    #[test]
    fn test_missing_photo_dir_is_fatal() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let paths = DayOnePaths::with_data_dir(source.path().to_path_buf());

        let err = FileCopier::new(&paths)
            .copy_photos(&dest.path().join(PHOTOS_DIR_NAME))
            .unwrap_err();
        assert!(matches!(err, BackupError::MissingSource(_)));
    }

    #[test]
    fn test_copy_all_reports_totals() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let paths = seed_source(source.path());

        let (report, photos) = FileCopier::new(&paths).copy_all(dest.path()).unwrap();

        assert_eq!(report.files, 6);
        assert_eq!(photos, dest.path().join("DayOnePhotos"));
        assert!(photos.join("a.jpeg").exists());
    }
}
