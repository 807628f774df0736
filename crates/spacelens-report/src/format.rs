//! Size, date and count formatting shared by the renderers.

use std::time::SystemTime;

use chrono::{DateTime, Local};
use humansize::{FormatSizeOptions, WINDOWS};

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

/// Format a byte size with a 1024 base and two decimals.
pub fn format_size(bytes: u64) -> String {
    let options = FormatSizeOptions::from(WINDOWS)
        .decimal_places(2)
        .decimal_zeroes(2);
    humansize::format_size(bytes, options)
}

/// Format a size, or `-` for zero.
pub fn format_size_or_dash(bytes: u64) -> String {
    if bytes > 0 {
        format_size(bytes)
    } else {
        "-".to_string()
    }
}

/// Local calendar date, e.g. `2024-03-01`.
pub fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d").to_string()
}

/// Local date, or `fallback` when the time is unknown.
pub fn format_date_or(time: Option<SystemTime>, fallback: &str) -> String {
    time.map(format_date).unwrap_or_else(|| fallback.to_string())
}

/// Local date and time, e.g. `2024-03-01 09:15:42`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Integer with thousands separators, e.g. `12,345`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// CSS class highlighting large sizes.
pub fn size_class(bytes: u64) -> &'static str {
    if bytes > GIB {
        "size-large"
    } else if bytes > 100 * MIB {
        "size-medium"
    } else {
        ""
    }
}

/// Truncate to at most `max` characters.
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
