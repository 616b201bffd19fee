//! Formatting utilities for CLI output.

use chrono::{DateTime, Utc};

/// Truncate a string to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Placeholder for absent values.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

/// Elapsed time between submission and completion, e.g. `85 ms` or `1.3 s`.
pub fn format_elapsed(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> String {
    let Some(end) = end else {
        return "-".to_string();
    };
    let millis = end.signed_duration_since(start).num_milliseconds().max(0);
    if millis < 1000 {
        format!("{} ms", millis)
    } else {
        format!("{:.1} s", millis as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hello", 3), "...");
        assert_eq!(truncate_str("héllo wörld", 7), "héll...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n\n  b\tc "), "a b c");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("x")), "x");
    }

    #[test]
    fn test_format_elapsed() {
        let start = Utc::now();
        assert_eq!(format_elapsed(start, None), "-");
        assert_eq!(
            format_elapsed(start, Some(start + Duration::milliseconds(85))),
            "85 ms"
        );
        assert_eq!(
            format_elapsed(start, Some(start + Duration::milliseconds(1300))),
            "1.3 s"
        );
    }
}
