//! Utility helpers — path resolution, ids, title and filename shaping.

use std::path::PathBuf;

/// Get the Murmur data directory (e.g. `~/.murmur/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".murmur")
}

/// Get the default store directory (e.g. `~/.murmur/store/`).
pub fn get_store_path() -> PathBuf {
    get_data_path().join("store")
}

/// Generate a fresh opaque identifier (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Derive a chat title from the first user message: the first `max_chars`
/// characters of the trimmed text followed by `...`. Unicode-safe.
pub fn title_from_text(text: &str, max_chars: usize) -> String {
    let prefix: String = text.trim().chars().take(max_chars).collect();
    format!("{prefix}...")
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
/// Unicode-safe.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// Sanitize a string for use as a filename.
pub fn safe_filename(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        return dirs_next::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(rest);
    }
    if path == "~" {
        return dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    }
    PathBuf::from(path)
}
