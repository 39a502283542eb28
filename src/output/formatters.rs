//! Reusable formatting utilities for CLI output

use chrono::{DateTime, Utc};

/// Placeholder for values that are unknown
pub const MISSING: &str = "--";

/// Format a timestamp as `dd - mm - yyyy` (UTC).
pub fn format_display_date(date: &DateTime<Utc>) -> String {
    date.format("%d - %m - %Y").to_string()
}

/// [`format_display_date`] or `--` when unknown.
pub fn format_optional_date(date: Option<&DateTime<Utc>>) -> String {
    date.map(format_display_date)
        .unwrap_or_else(|| MISSING.to_string())
}

/// Truncate to `max_chars` characters, ending with an ellipsis when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Comma-separated list, or `--` when empty.
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        MISSING.to_string()
    } else {
        items.join(", ")
    }
}
