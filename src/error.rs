//! Custom error types for dayone-backup
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// A precondition checked before the pipeline starts was violated
    #[error("{0}")]
    Precondition(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(String),

    /// Journal database errors
    #[error("Database error: {0}")]
    Database(String),

    /// The timestamped destination for this run is already taken
    #[error("Backup instance already exists: {}", .0.display())]
    InstanceExists(PathBuf),

    /// A required source file or directory is missing
    #[error("Source not found: {}", .0.display())]
    MissingSource(PathBuf),
}

impl BackupError {
    /// Process exit status for this error
    ///
    /// Precondition and configuration failures happen before anything is
    /// written and exit with 1. Everything else comes out of the pipeline.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Precondition(_) | Self::Config(_) => 1,
            _ => 2,
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<rusqlite::Error> for BackupError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias for backup operations
pub type BackupResult<T> = Result<T, BackupError>;
