//! Configuration module for dayone-backup
//!
//! This module provides configuration management including:
//! - Day One source path resolution
//! - Settings file loading and command-line overrides

pub mod paths;
pub mod settings;

pub use paths::DayOnePaths;
pub use settings::Settings;
