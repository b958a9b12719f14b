//! Small shared helpers — path resolution, timestamps, excerpt truncation.

use std::path::PathBuf;

/// Get the Triage data directory (e.g. `~/.triage/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".triage")
}

/// Current unix timestamp in whole seconds.
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Take the first `max_chars` characters of a string. Unicode-safe.
///
/// Used for the diagnostic excerpt carried by parse errors.
pub fn truncate_excerpt(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Helper to get the home directory.
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_excerpt("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_excerpt("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_excerpt("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_unicode() {
        assert_eq!(truncate_excerpt("こんにちは世界", 3), "こんに");
    }

    #[test]
    fn test_data_path_ends_with_triage() {
        assert!(get_data_path().ends_with(".triage"));
    }

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2024-01-01 as a sanity floor
        assert!(unix_timestamp() > 1_704_000_000);
    }
}
