//! Timestamp rendering for the `%b` and `%l` directives.
use std::fmt::Write as _;

use chrono::{Local, TimeZone as _};

/// Default strftime format. chrono renders `%c` in the C-locale layout,
/// e.g. `Thu Jul  1 00:00:00 2021`, whatever the user's locale.
pub const DEFAULT_TIME_FORMAT: &str = "%c";

/// Render a Unix timestamp in local time with a strftime-style format.
///
/// Returns `None` for a zero timestamp, a timestamp out of range, or a
/// format string chrono rejects.
///
/// # Examples
///
/// ```
/// use pkgfmt::format::time::format_timestamp;
///
/// assert_eq!(format_timestamp(1_700_000_000, "%s").as_deref(), Some("1700000000"));
/// assert_eq!(format_timestamp(0, "%s"), None);
/// ```
#[must_use]
pub fn format_timestamp(timestamp: i64, format: &str) -> Option<String> {
    if timestamp == 0 {
        return None;
    }
    let datetime = Local.timestamp_opt(timestamp, 0).single()?;
    let mut out = String::new();
    write!(out, "{}", datetime.format(format)).ok()?;
    Some(out)
}
