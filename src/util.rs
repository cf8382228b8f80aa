// Forgiving parsing and percentage math shared by the whole core.
//
// CSV exports are messy; these helpers absorb the mess so the aggregators
// can assume clean, typed values and never divide by zero.
use num_format::{Locale, ToFormattedString};

/// Parse an optional string field into `f64`, tolerating the formatting
/// quirks common in exported tables: surrounding whitespace and thousands
/// separators. Anything containing letters is rejected outright.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Round to one decimal place. Chart percentages are reported at this
/// precision everywhere.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// `100 * count / total` at one decimal. A zero total yields `0.0` rather
/// than NaN so empty filter results still render.
pub fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(count as f64 * 100.0 / total as f64)
}

/// Thousands-separated integer for console messages (e.g. `9,855 rows`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
