//! dayone-backup - Rotating backups of a local Day One journal
//!
//! This library copies the Day One database artifacts and photo library into
//! a timestamped folder, compresses the photos, prunes old backups beyond a
//! retention count and reads the newest entries back from the copy.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Source path resolution and settings
//! - `error`: Custom error types
//! - `backup`: Retention, copying, archiving and the pipeline driving them
//! - `journal`: Read-only queries against a copied database
//! - `display`: Terminal formatting
//! - `cli`: Precondition checks and the backup command
//!
//! # Example
//!
//! ```rust,ignore
//! use dayone_backup::backup::BackupPipeline;
//! use dayone_backup::config::{DayOnePaths, Settings};
//!
//! let paths = DayOnePaths::new()?;
//! let pipeline = BackupPipeline::new(paths, "/Volumes/Backup".into(), Settings::default());
//! let outcome = pipeline.run(&mut |event| println!("{:?}", event))?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod journal;

pub use error::{BackupError, BackupResult};
