//! Display formatting for terminal output
//!
//! Provides utilities for formatting journal entries and backup summaries.

pub mod backup;
pub mod entry;

pub use backup::format_size;
pub use entry::{format_entry, truncate_text, MAX_TEXT_LENGTH};
