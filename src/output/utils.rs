//! Shared utility functions for output formatting

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::walker::Entry;

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format a modification time as RFC 3339 in UTC, to the second.
pub fn format_mtime(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format the columns shown before the path in a long listing.
///
/// Error entries without metadata get placeholder columns so paths stay aligned.
pub fn long_columns(entry: &Entry) -> String {
    let type_letter = entry.file_type().map(|t| t.letter()).unwrap_or('?');
    let mode = entry
        .mode()
        .map(|m| format!("{:04o}", m))
        .unwrap_or_else(|| "----".to_string());
    let size = entry.size().map(format_size).unwrap_or_else(|| "-".to_string());
    let mtime = entry
        .modified()
        .map(format_mtime)
        .unwrap_or_else(|| "-".to_string());
    format!("{} {} {:>7} {:<20}", type_letter, mode, size, mtime)
}
