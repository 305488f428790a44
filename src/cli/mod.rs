//! CLI command handlers
//!
//! Bridges the clap argument parsing with the backup pipeline.

pub mod backup;

pub use backup::{run_backup, validate, BackupArgs};
