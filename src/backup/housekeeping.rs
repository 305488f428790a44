//! OS housekeeping entries
//!
//! Finder drops `.DS_Store` files into every folder it opens. They are never
//! counted as backups, never deleted by rotation and never copied.

use std::ffi::OsStr;

/// File name of the Finder metadata file
pub const DS_STORE: &str = ".DS_Store";

/// Check whether a directory entry name is OS housekeeping
pub fn is_housekeeping(name: impl AsRef<OsStr>) -> bool {
    name.as_ref() == DS_STORE
}
