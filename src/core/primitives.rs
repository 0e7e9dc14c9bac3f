use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{TimelineError, TimelineResult};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts fractional unix milliseconds back to an instant, rounding to the
/// nearest millisecond.
pub fn unix_millis_to_datetime(millis: f64) -> TimelineResult<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(TimelineError::InvalidData(
            "instant must be finite".to_owned(),
        ));
    }
    let rounded = millis.round();
    if rounded > i64::MAX as f64 || rounded < i64::MIN as f64 {
        return Err(TimelineError::InvalidData(format!(
            "instant {millis} ms is out of range"
        )));
    }
    DateTime::<Utc>::from_timestamp_millis(rounded as i64).ok_or_else(|| {
        TimelineError::InvalidData(format!("instant {millis} ms is out of range"))
    })
}

/// UTC midnight of a calendar day, in unix milliseconds.
#[must_use]
pub fn day_start_millis(day: NaiveDate) -> f64 {
    day.and_time(chrono::NaiveTime::MIN)
        .and_utc()
        .timestamp_millis() as f64
}
