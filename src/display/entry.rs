//! Journal entry formatting for terminal output

use crate::journal::JournalEntry;

/// Maximum characters of entry text shown in the preview
pub const MAX_TEXT_LENGTH: usize = 50;

/// Truncate `text` to `max_chars` characters, appending `...` when cut
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Format a journal entry for the post-backup preview
pub fn format_entry(entry: &JournalEntry) -> String {
    format!(
        "----------\nEntry, Date: {}-{}-{}\nText: '{}'",
        entry.year,
        entry.month,
        entry.day,
        truncate_text(&entry.text, MAX_TEXT_LENGTH)
    )
}
