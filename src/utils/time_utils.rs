use chrono::{DateTime, Local, NaiveDate};

/// Date format used for display and CSV output.
pub const STANDARD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a Socrata draw date into a calendar date.
///
/// The dataset serves floating timestamps such as `2024-01-01T00:00:00.000`;
/// only the date part is meaningful for a twice-daily drawing, so anything
/// after a `T` is ignored.
pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next().unwrap_or("");
    NaiveDate::parse_from_str(date_part, STANDARD_DATE_FORMAT).ok()
}

pub fn epoch_sec_to_utc(epoch_sec: i64) -> String {
    // Used for display purposes
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => dt.format(STANDARD_DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

pub fn local_now_as_timestamp_ms() -> i64 {
    let now_local = Local::now();
    now_local.timestamp_millis()
}

pub fn how_many_seconds_ago(past_timestamp_ms: i64) -> i64 {
    // How many seconds ago was the event described by `past_timestamp_ms` ?
    let now_timestamp_ms = local_now_as_timestamp_ms();
    (now_timestamp_ms - past_timestamp_ms) / 1000
}
