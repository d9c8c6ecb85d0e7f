//! Commit id and commit time helpers

use chrono::{DateTime, Utc};

use crate::CoreError;

/// Returns true for a plausible (possibly abbreviated) hex object id.
///
/// Ids flow from the store straight into git argument lists, so anything
/// that could be read as an option or a revision expression is rejected.
pub fn is_commit_id(s: &str) -> bool {
    (4..=64).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Whether `full` names the same commit as the possibly abbreviated `sha`
///
/// Hex digits compare case-insensitively; git always prints lowercase.
pub fn same_commit(sha: &str, full: &str) -> bool {
    sha.len() <= full.len()
        && full
            .get(..sha.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(sha))
}

/// Converts Unix epoch seconds into `YYYY-MM-DDTHH:MM:SSZ`
pub fn epoch_to_iso8601(secs: i64) -> Result<String, CoreError> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S")))
        .ok_or(CoreError::TimestampOutOfRange(secs))
}
