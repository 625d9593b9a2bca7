use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp layout written by the thermometer CSV export (`09/21/23 14:30:00`).
pub const THERMOMETER_TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S";

const FALLBACK_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

const MISSING_MARKERS: &[&str] = &["", "none", "null", "nan"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("malformed sample timestamp: '{0}'")]
    MalformedTimestamp(String),
}

/// A reading as delivered by a feed, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub timestamp: String,
    pub value: String,
}

impl RawSample {
    #[must_use]
    pub fn new(timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }

    /// Splits a `timestamp,value` message body.
    ///
    /// A body without a comma is treated as a timestamp with a missing value.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        match body.split_once(',') {
            Some((timestamp, value)) => Self::new(timestamp.trim(), value.trim()),
            None => Self::new(body.trim(), ""),
        }
    }
}

/// One timestamped reading. `value` is `None` when the probe dropped out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

impl Sample {
    #[must_use]
    pub const fn new(timestamp: NaiveDateTime, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    /// Parses a raw reading.
    ///
    /// An unreadable value is kept as an absent reading so the sample still
    /// occupies its slot in the window.
    ///
    /// # Errors
    ///
    /// Returns `SampleError::MalformedTimestamp` if the timestamp matches none
    /// of the accepted layouts.
    pub fn parse(raw: &RawSample) -> Result<Self, SampleError> {
        let timestamp = parse_timestamp(&raw.timestamp)?;
        Ok(Self::new(timestamp, parse_value(&raw.value)))
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// Accepts the thermometer layout, RFC 3339 (offset dropped, wall clock kept)
/// and ISO-like `YYYY-MM-DD HH:MM:SS`.
///
/// # Errors
///
/// Returns `SampleError::MalformedTimestamp` when no layout matches.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, SampleError> {
    let trimmed = input.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, THERMOMETER_TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.naive_local());
    }
    FALLBACK_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| SampleError::MalformedTimestamp(trimmed.to_string()))
}

/// Missing markers and anything that is not a finite number read as absent.
#[must_use]
pub fn parse_value(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 9, 21)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid date")
    }

    #[test]
    fn parses_thermometer_layout() {
        let sample = Sample::parse(&RawSample::new("09/21/23 14:30:00", "225.5"))
            .expect("parse");
        assert_eq!(sample.timestamp, ts(14, 30, 0));
        assert_eq!(sample.value, Some(225.5));
    }

    #[test]
    fn parses_rfc3339_and_iso_layouts() {
        assert_eq!(
            parse_timestamp("2023-09-21T14:30:00Z").expect("rfc3339"),
            ts(14, 30, 0)
        );
        assert_eq!(
            parse_timestamp("2023-09-21 14:30:30").expect("iso"),
            ts(14, 30, 30)
        );
    }

    #[test]
    fn missing_markers_read_as_absent() {
        for marker in ["", "None", "NONE", " none ", "null", "NaN"] {
            assert_eq!(parse_value(marker), None, "marker {marker:?}");
        }
    }

    #[test]
    fn unparseable_value_is_absent_not_an_error() {
        let sample = Sample::parse(&RawSample::new("09/21/23 14:30:00", "hot"))
            .expect("timestamp is fine");
        assert!(!sample.is_present());
    }

    #[test]
    fn infinite_value_is_absent() {
        assert_eq!(parse_value("inf"), None);
    }

    #[test]
    fn malformed_timestamp_is_an_error() {
        let err = Sample::parse(&RawSample::new("yesterday-ish", "200")).expect_err("bad ts");
        assert_eq!(err, SampleError::MalformedTimestamp("yesterday-ish".into()));
        assert_eq!(
            err.to_string(),
            "malformed sample timestamp: 'yesterday-ish'"
        );
    }

    #[test]
    fn body_splits_on_first_comma() {
        let raw = RawSample::from_body("09/21/23 14:30:00, 212.0");
        assert_eq!(raw, RawSample::new("09/21/23 14:30:00", "212.0"));

        let raw = RawSample::from_body("09/21/23 14:30:00");
        assert_eq!(raw.value, "");
    }
}
