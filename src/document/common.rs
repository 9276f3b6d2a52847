//! Common utilities for document generation.
//!
//! Shared helpers for date formatting and export file naming.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Format a date in long form (e.g., "June 1, 2024").
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Today's date in the server's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Turn a raw date input into the stored display string.
///
/// ISO dates (`2024-06-01`) become "June 1, 2024", blank input becomes an
/// empty answer, and anything else is kept as typed.
pub fn normalize_date_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => format_long_date(date),
        Err(_) => raw.to_string(),
    }
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_dash && !result.is_empty() {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-');
    if result.is_empty() {
        return fallback.to_string();
    }

    result.to_string()
}

/// Download name for an exported document, e.g. `rental-agreement-1717200000000.txt`.
pub fn export_filename(title: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}.txt",
        sanitize_filename(title, "document"),
        at.timestamp_millis()
    )
}
