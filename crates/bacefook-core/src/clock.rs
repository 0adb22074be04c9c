//! Batch timestamps.
//!
//! Every event of a batch carries the same `created_at` string: the UTC time
//! at which the batch was generated, in ISO-8601 form with the `-`, `:` and
//! `.` separators stripped (`20250101T120000123Z`). The result is safe to
//! embed in file names.

use chrono::{DateTime, Utc};

/// `chrono` format string for batch timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3fZ";

/// Render the timestamp shared by all events of a batch generated at `at`.
pub fn batch_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn strips_iso_separators() {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 7, 9, 5, 2)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(45))
            .unwrap();
        assert_eq!(batch_timestamp(at), "20250307T090502045Z");
    }

    #[test]
    fn is_filename_safe() {
        let stamp = batch_timestamp(Utc::now());
        assert!(stamp.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(stamp.ends_with('Z'));
        assert_eq!(stamp.len(), 19);
    }
}
