//! Timestamp handling.
//!
//! All review times are `DateTime<Utc>`. Text timestamps coming from
//! clients must carry an explicit offset; naive values are rejected
//! rather than assumed to be UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ScheduleError;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse an RFC 3339 timestamp and normalize it to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let trimmed = value.trim();

    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => {
            let naive = NAIVE_FORMATS
                .iter()
                .any(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).is_ok());
            let reason = if naive {
                "missing timezone offset".to_string()
            } else {
                e.to_string()
            };
            Err(ScheduleError::InvalidTimestamp {
                value: value.to_string(),
                reason,
            })
        }
    }
}
