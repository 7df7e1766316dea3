use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Seconds elapsed from `since` to `until`, never negative.
pub fn elapsed_secs(since: DateTime<Utc>, until: DateTime<Utc>) -> f64 {
    let millis = (until - since).num_milliseconds().max(0);
    millis as f64 / 1000.0
}

/// Compact date stamp used in download filenames.
pub fn file_stamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d_%H%M").to_string()
}
