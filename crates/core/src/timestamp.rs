//! Display formatting of source-provided event dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Fixed display format written to the `changed` state.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Render a client-supplied date as `YYYY-MM-DD hh:mm:ss`.
///
/// Dates with an offset are converted to UTC so the result does not depend
/// on the host time zone. Naive dates are rendered as given and a bare
/// `YYYY-MM-DD` date becomes midnight of that day. Input that does not parse
/// is returned unchanged.
pub fn format_display(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format(DISPLAY_FORMAT).to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.naive_utc().format(DISPLAY_FORMAT).to_string();
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}
