//! Date display filter

use chrono::{Local, NaiveDate};

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// date_display(&date, "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn date_display(date: &NaiveDate, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// ISO date used in front matter and `<time datetime>` attributes
pub fn date_iso(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a front-matter date (`2024-01-15` or `2024-01-15 10:30:00`)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Generate a <time> HTML element
pub fn time_tag(date: &NaiveDate, format: &str) -> String {
    format!(
        r#"<time datetime="{}">{}</time>"#,
        date_iso(date),
        date_display(date, format)
    )
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each group
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Lowercase weekday tokens last so "DD" is already consumed
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
