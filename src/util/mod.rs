use chrono::{DateTime, Local, NaiveDateTime, Timelike, Utc};

/// Format used by `<input type="datetime-local">`.
pub(crate) const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub(crate) fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Browser wall clock, truncated to the minute like the picker itself.
pub(crate) fn now_local_minute() -> NaiveDateTime {
    truncate_to_minute(Local::now().naive_local())
}

pub(crate) fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

pub(crate) fn format_datetime_local(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Accepts the picker's value with or without seconds.
pub(crate) fn parse_datetime_local(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// A server timestamp as the user's local wall time, for the picker.
pub(crate) fn to_local_naive(dt: &DateTime<Utc>) -> NaiveDateTime {
    dt.with_timezone(&Local).naive_local()
}

/// The user's picked wall time as an instant. Ambiguous local times (DST
/// fold) resolve to the earlier instant.
pub(crate) fn local_to_utc(naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Naive UTC as accepted by the create/update endpoints (`fromisoformat`).
pub(crate) fn format_naive_utc(dt: &DateTime<Utc>) -> String {
    dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Human-readable local time for table cells.
pub(crate) fn display_time(dt: &DateTime<Utc>) -> String {
    to_local_naive(dt).format("%Y-%m-%d %H:%M").to_string()
}

/// Cuts `text` to at most `max` characters. Returns whether it was cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> (String, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (text[..idx].to_string(), true),
        None => (text.to_string(), false),
    }
}
