use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const NOT_AVAILABLE: &str = "N/A";

/// Timestamps without an offset are read as local time in the target zone.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Render an API timestamp as `Mon,DD,YYYY HH:MM:SS` in local time.
pub fn format_date(value: Option<&str>) -> String {
    format_date_in(value, &Local)
}

/// Like [`format_date`] for an explicit time zone. Missing or unparsable
/// input renders as `N/A`.
pub fn format_date_in<Tz>(value: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|raw| parse_timestamp(raw, tz))
        .map(|dt| dt.format("%b,%d,%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .and_then(|n| tz.from_local_datetime(&n).earliest())
    })
}
