//! Input rules applied before anything reaches storage.
//!
//! - Session names: trimmed, must be non-empty, truncated to
//!   [`config::SESSION_NAME_MAX_CHARS`] characters.
//! - Notes: at most [`config::NOTE_MAX_CHARS`] characters.

use crate::config;
use crate::error::SessionError;

/// Normalize a requested session name, or reject it when nothing is left after trimming.
pub fn normalize_session_name(raw: &str) -> Result<String, SessionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::EmptyName);
    }
    // Count chars, not bytes, so multi-byte names are cut on a boundary
    let name: String = trimmed.chars().take(config::SESSION_NAME_MAX_CHARS).collect();
    Ok(name.trim_end().to_string())
}

/// Whether a note fits the UI edge limit
pub fn is_valid_note_content(content: &str) -> bool {
    content.chars().count() <= config::NOTE_MAX_CHARS
}
