use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime};

fn as_secs(dur: std::time::Duration) -> f64 {
    (dur.as_secs() as f64) * 1.0 + (dur.subsec_nanos() as f64) * 0.000000001
}

pub struct Timer(std::time::Instant);

impl Timer {
    pub fn new() -> Timer {
        Timer(std::time::Instant::now())
    }

    pub fn since(&self) -> f64 {
        as_secs(self.0.elapsed())
    }
}

const TIMEFORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const TIMEFORMAT_FRAC: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIMEFORMAT_SPACE: &str = "%Y-%m-%d %H:%M:%S";
const DATEFORMAT: &str = "%Y-%m-%d";

/// Parses the timestamps found in open data metadata, returning seconds
/// since the epoch.
pub fn parse_timestamp(ts: &str) -> Result<i64> {
    let ts = ts.trim();
    for fmt in [TIMEFORMAT_FRAC, TIMEFORMAT, TIMEFORMAT_SPACE] {
        if let Ok(tm) = NaiveDateTime::parse_from_str(ts, fmt) {
            return Ok(tm.and_utc().timestamp());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Ok(dt.timestamp());
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(ts, DATEFORMAT) {
        if let Some(tm) = d.and_hms_opt(0, 0, 0) {
            return Ok(tm.and_utc().timestamp());
        }
    }

    Err(Error::InvalidInput(format!(
        "can't parse timestamp {:?}: use \"{}\" or \"{}\"",
        ts, TIMEFORMAT, DATEFORMAT
    )))
}

pub fn timestamp_string(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format(TIMEFORMAT).to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-01T00:01:00").unwrap(), 60);
        assert_eq!(parse_timestamp("2024-05-01T12:34:56.123456").unwrap(), parse_timestamp("2024-05-01T12:34:56").unwrap());
        assert_eq!(parse_timestamp("2024-05-01 00:00:00").unwrap(), parse_timestamp("2024-05-01").unwrap());
        assert_eq!(parse_timestamp("1970-01-02T00:00:00+00:00").unwrap(), 86400);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_timestamp_string() {
        let ts = parse_timestamp("2023-11-05T08:09:10.5").unwrap();
        assert_eq!(timestamp_string(ts), "2023-11-05T08:09:10");
    }
}
