//! Read-only access to a copied Day One journal database
//!
//! Used after a backup to show the newest entries, confirming the snapshot
//! is fresh and readable. Only the copy inside a backup instance is ever
//! opened, never the live database.

use std::path::Path;

use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use crate::error::{BackupError, BackupResult};

/// Number of entries shown after a backup
pub const PREVIEW_LIMIT: u32 = 3;

const LATEST_ENTRIES_SQL: &str = "SELECT ZGREGORIANYEAR, ZGREGORIANMONTH, ZGREGORIANDAY, ZTEXT \
     FROM ZENTRY \
     WHERE ZGREGORIANYEAR >= ?1 \
     ORDER BY ZGREGORIANMONTH DESC, ZGREGORIANDAY DESC \
     LIMIT ?2";

/// A single journal entry as stored by Day One
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub text: String,
}

/// Read-only handle on a journal database
pub struct JournalDb {
    conn: Connection,
}

impl JournalDb {
    /// Open the database at `path` read-only
    pub fn open(path: &Path) -> BackupResult<Self> {
        if !path.is_file() {
            return Err(BackupError::MissingSource(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            BackupError::Database(format!("Failed to open {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "journal database opened");

        Ok(Self { conn })
    }

    /// Fetch the newest entries written in `since_year` or later
    ///
    /// Ordered by month, then day, both descending.
    pub fn latest_entries(&self, since_year: i32, limit: u32) -> BackupResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(LATEST_ENTRIES_SQL)?;
        let rows = stmt.query_map(params![since_year, limit], |row| {
            Ok(JournalEntry {
                year: row.get(0)?,
                month: row.get(1)?,
                day: row.get(2)?,
                text: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?;

        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "journal entries loaded");
        Ok(entries)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Build a minimal Day One database with the given entries
    pub(crate) fn create_journal(path: &Path, entries: &[(i32, u32, u32, Option<&str>)]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE ZENTRY (
                Z_PK INTEGER PRIMARY KEY,
                ZGREGORIANYEAR INTEGER,
                ZGREGORIANMONTH INTEGER,
                ZGREGORIANDAY INTEGER,
                ZTEXT VARCHAR
            );",
        )
        .unwrap();
        for (year, month, day, text) in entries {
            conn.execute(
                "INSERT INTO ZENTRY (ZGREGORIANYEAR, ZGREGORIANMONTH, ZGREGORIANDAY, ZTEXT) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![year, month, day, text],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_latest_entries_ordering_and_limit() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("DayOne.sqlite");
        create_journal(
            &db_path,
            &[
                (2026, 1, 5, Some("january")),
                (2026, 3, 2, Some("march second")),
                (2026, 3, 14, Some("march fourteenth")),
                (2026, 2, 28, Some("february")),
                (2025, 12, 31, Some("last year")),
            ],
        );

        let db = JournalDb::open(&db_path).unwrap();
        let entries = db.latest_entries(2026, PREVIEW_LIMIT).unwrap();

        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["march fourteenth", "march second", "february"]);
        assert_eq!(entries[0].year, 2026);
        assert_eq!(entries[0].month, 3);
        assert_eq!(entries[0].day, 14);
    }

    #[test]
    fn test_older_years_filtered() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("DayOne.sqlite");
        create_journal(&db_path, &[(2024, 6, 1, Some("old"))]);

        let db = JournalDb::open(&db_path).unwrap();
        assert!(db.latest_entries(2026, 3).unwrap().is_empty());
    }

    #[test]
    fn test_null_text_is_empty() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("DayOne.sqlite");
        create_journal(&db_path, &[(2026, 4, 1, None)]);

        let db = JournalDb::open(&db_path).unwrap();
        let entries = db.latest_entries(2026, 3).unwrap();
        assert_eq!(entries[0].text, "");
    }

    #[test]
    fn test_open_missing_database() {
        let temp = TempDir::new().unwrap();
        let err = JournalDb::open(&temp.path().join("DayOne.sqlite"))
            .err()
            .unwrap();
        assert!(matches!(err, BackupError::MissingSource(_)));
    }

    #[test]
    fn test_query_on_unrelated_database_fails() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("DayOne.sqlite");
        Connection::open(&db_path)
            .unwrap()
            .execute_batch("CREATE TABLE OTHER (X INTEGER);")
            .unwrap();

        let db = JournalDb::open(&db_path).unwrap();
        let err = db.latest_entries(2026, 3).unwrap_err();
        assert!(matches!(err, BackupError::Database(_)));
    }

    #[test]
    fn test_garbage_file_fails() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("DayOne.sqlite");
        std::fs::write(&db_path, vec![b'x'; 4096]).unwrap();

        let result = JournalDb::open(&db_path).and_then(|db| db.latest_entries(2026, 3));
        assert!(matches!(result, Err(BackupError::Database(_))));
    }
}
