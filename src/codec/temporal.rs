// In: src/codec/temporal.rs

//! The Temporal Codec.
//!
//! A timestamp column stores `i64` ticks since the Unix epoch at one unit fixed
//! when the handler is built. Conversion from a wall-clock instant truncates
//! toward the earlier instant (floor), so sub-unit precision is dropped and
//! never rounded up. Dates are stored as days since 1970-01-01 (`Date32`).

use arrow_schema::TimeUnit;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ConvError;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Converts an instant into ticks of `unit`.
///
/// Only nanosecond ticks can overflow (beyond roughly the years 1677..2262).
pub fn instant_to_ticks(instant: &DateTime<Utc>, unit: TimeUnit) -> Result<i64, ConvError> {
    match unit {
        TimeUnit::Second => Ok(instant.timestamp()),
        TimeUnit::Millisecond => Ok(instant.timestamp_millis()),
        TimeUnit::Microsecond => Ok(instant.timestamp_micros()),
        TimeUnit::Nanosecond => instant.timestamp_nanos_opt().ok_or_else(|| {
            ConvError::ConversionOverflow(format!(
                "instant {} is outside the nanosecond timestamp range",
                instant
            ))
        }),
    }
}

/// Converts ticks of `unit` back into an instant.
pub fn ticks_to_instant(ticks: i64, unit: TimeUnit) -> Result<DateTime<Utc>, ConvError> {
    let instant = match unit {
        TimeUnit::Second => DateTime::from_timestamp(ticks, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(ticks),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(ticks),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(ticks)),
    };
    instant.ok_or_else(|| {
        ConvError::ConversionOverflow(format!(
            "{} ticks of {:?} is outside the representable date range",
            ticks, unit
        ))
    })
}

/// Drops everything finer than `unit`, exactly as a store-then-load would.
pub fn truncate_to_unit(instant: &DateTime<Utc>, unit: TimeUnit) -> Result<DateTime<Utc>, ConvError> {
    ticks_to_instant(instant_to_ticks(instant, unit)?, unit)
}

/// Converts a calendar date into days since the Unix epoch.
pub fn date_to_days(date: &NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Converts days since the Unix epoch back into a calendar date.
pub fn days_to_date(days: i32) -> Result<NaiveDate, ConvError> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            ConvError::ConversionOverflow(format!("{} days is outside the representable date range", days))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Timelike};

    fn instant(s: &str, nanos: u32) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_microsecond_roundtrip_truncates() {
        let original = instant("2023-05-01 12:00:00", 123_456_789);
        let ticks = instant_to_ticks(&original, TimeUnit::Microsecond).unwrap();
        let decoded = ticks_to_instant(ticks, TimeUnit::Microsecond).unwrap();
        assert_eq!(decoded, instant("2023-05-01 12:00:00", 123_456_000));
        assert_eq!(decoded.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_every_unit_roundtrips_at_its_own_resolution() {
        let original = instant("2024-02-29 23:59:59", 987_654_321);
        let expected = [
            (TimeUnit::Second, 0),
            (TimeUnit::Millisecond, 987_000_000),
            (TimeUnit::Microsecond, 987_654_000),
            (TimeUnit::Nanosecond, 987_654_321),
        ];
        for (unit, nanos) in expected {
            let decoded = truncate_to_unit(&original, unit).unwrap();
            assert_eq!(decoded, instant("2024-02-29 23:59:59", nanos), "unit {:?}", unit);
        }
    }

    #[test]
    fn test_pre_epoch_truncates_toward_earlier_instant() {
        let original = instant("1969-12-31 23:59:59", 500_000_000);
        let ticks = instant_to_ticks(&original, TimeUnit::Second).unwrap();
        assert_eq!(ticks, -1);
        let ticks = instant_to_ticks(&original, TimeUnit::Millisecond).unwrap();
        assert_eq!(ticks, -500);
    }

    #[test]
    fn test_nanosecond_overflow() {
        let far = instant("2400-01-01 00:00:00", 0);
        let result = instant_to_ticks(&far, TimeUnit::Nanosecond);
        assert!(matches!(result, Err(ConvError::ConversionOverflow(_))));
        assert!(instant_to_ticks(&far, TimeUnit::Microsecond).is_ok());
    }

    #[test]
    fn test_out_of_range_ticks() {
        let result = ticks_to_instant(i64::MAX, TimeUnit::Second);
        assert!(matches!(result, Err(ConvError::ConversionOverflow(_))));
    }

    #[test]
    fn test_date_days_roundtrip() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_days(&epoch), 0);
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let days = date_to_days(&date);
        assert_eq!(days, 19478);
        assert_eq!(days_to_date(days).unwrap(), date);
        let before = NaiveDate::from_ymd_opt(1969, 12, 31).unwrap();
        assert_eq!(date_to_days(&before), -1);
        assert!(days_to_date(i32::MAX).is_err());
    }
}
