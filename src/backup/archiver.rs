//! Archiver for dayone-backup
//!
//! Packs a directory into a gzip-compressed tarball next to it and removes
//! the directory once the archive is completely on disk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, info};

use crate::error::{BackupError, BackupResult};

/// Extension appended to the archived directory's path
pub const ARCHIVE_EXTENSION: &str = "tar.gz";

/// A finished archive
#[derive(Debug, Clone)]
pub struct ArchiveInfo {
    /// Path of the `.tar.gz` file
    pub path: PathBuf,
    /// Size of the compressed file in bytes
    pub size_bytes: u64,
}

/// Compresses directories into `.tar.gz` archives
#[derive(Debug, Clone, Copy)]
pub struct Archiver {
    level: Compression,
}

impl Default for Archiver {
    fn default() -> Self {
        Self {
            level: Compression::best(),
        }
    }
}

impl Archiver {
    /// Path of the archive produced for `source`
    pub fn archive_path(source: &Path) -> PathBuf {
        let mut path = source.as_os_str().to_owned();
        path.push(".");
        path.push(ARCHIVE_EXTENSION);
        PathBuf::from(path)
    }

    /// Compress `source` into `<source>.tar.gz`, then delete `source`
    ///
    /// The archive is written to a temporary name and renamed into place, so
    /// `<source>.tar.gz` only ever refers to a complete archive. If anything
    /// fails before the rename, the temporary file is removed and `source` is
    /// left untouched.
    pub fn compress_and_remove(&self, source: &Path) -> BackupResult<ArchiveInfo> {
        let info = self.compress(source)?;

        fs::remove_dir_all(source).map_err(|e| {
            BackupError::Io(format!(
                "Failed to remove {} after archiving: {}",
                source.display(),
                e
            ))
        })?;
        debug!(path = %source.display(), "uncompressed copy removed");

        Ok(info)
    }

    /// Compress `source` into `<source>.tar.gz`, leaving `source` in place
    pub fn compress(&self, source: &Path) -> BackupResult<ArchiveInfo> {
        if !source.is_dir() {
            return Err(BackupError::MissingSource(source.to_path_buf()));
        }

        let path = Self::archive_path(source);
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        if let Err(e) = self.write_archive(source, &temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            BackupError::Archive(format!(
                "Failed to move archive into place at {}: {}",
                path.display(),
                e
            ))
        })?;

        let size_bytes = fs::metadata(&path)?.len();
        info!(path = %path.display(), size_bytes, "archive written");
        Ok(ArchiveInfo { path, size_bytes })
    }

    fn write_archive(&self, source: &Path, dest: &Path) -> BackupResult<()> {
        let root = source
            .file_name()
            .ok_or_else(|| {
                BackupError::Archive(format!("Cannot archive {}", source.display()))
            })?
            .to_os_string();

        let file = File::create(dest).map_err(|e| {
            BackupError::Archive(format!("Failed to create {}: {}", dest.display(), e))
        })?;

        let encoder = GzEncoder::new(BufWriter::new(file), self.level);
        let mut builder = tar::Builder::new(encoder);
        builder.follow_symlinks(false);
        builder.append_dir_all(&root, source).map_err(|e| {
            BackupError::Archive(format!("Failed to pack {}: {}", source.display(), e))
        })?;

        let encoder = builder
            .into_inner()
            .map_err(|e| BackupError::Archive(format!("tar finalize failed: {}", e)))?;
        let mut writer = encoder
            .finish()
            .map_err(|e| BackupError::Archive(format!("gzip finish failed: {}", e)))?;
        writer
            .flush()
            .map_err(|e| BackupError::Archive(format!("Failed to flush archive: {}", e)))?;

        // Sync to disk before the rename makes the archive visible
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| BackupError::Archive(format!("Failed to sync archive: {}", e)))?;

        Ok(())
    }
}
