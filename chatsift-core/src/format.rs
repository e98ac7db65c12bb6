//! Formatting helpers shared by the reports and exports.

use chrono::{DateTime, TimeZone};

/// Format a creation time as `YYYY-MM-DD HH:MM`, or `Unknown` if missing.
pub fn format_timestamp<Tz: TimeZone>(ts: Option<DateTime<Tz>>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match ts {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Format a percentage with one decimal place (e.g., "42.5%").
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// The first `max` characters of `text`, without any marker.
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Cut `text` to `max` characters and append "..." when anything was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let kept = take_chars(text, max);
    if kept.len() < text.len() {
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Shorten an identifier for column display.
pub fn short_id(id: &str, max: usize) -> &str {
    take_chars(id, max)
}
