//! Formatting utilities for log output

use std::time::Duration;

/// First 12 characters of a commit id
pub(crate) fn short_sha(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}

/// Formats a duration as `12.3s`, `4m 5s` or `1h 2m 3s`
pub(crate) fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    match secs {
        0..=59 => format!("{:.1}s", d.as_secs_f64()),
        60..=3599 => format!("{}m {}s", secs / 60, secs % 60),
        _ => format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("abc1234567890abcdef"), "abc123456789");
        assert_eq!(short_sha("abcd"), "abcd");
    }
}
