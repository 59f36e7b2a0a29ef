// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Building UTC event schedules from venue wall-clock times.
//!
//! Admins think in the venue's local time ("18:00 to 23:00 on June 1st");
//! schedules are stored in UTC. Times are interpreted in the venue's IANA
//! timezone. An end time at or before the start time is taken to be on the
//! following day, which is how late events past midnight are entered.
//! Local times that DST makes ambiguous or nonexistent are rejected rather
//! than guessed.

use crate::error::DomainError;
use crate::event::EventSchedule;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use time::OffsetDateTime;

fn to_naive_date(date: time::Date) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(date.year(), u32::from(u8::from(date.month())), u32::from(date.day()))
        .ok_or_else(|| DomainError::InvalidSchedule {
            reason: format!("Invalid event date: {date}"),
        })
}

fn to_naive_time(t: time::Time) -> Result<NaiveTime, DomainError> {
    NaiveTime::from_hms_opt(
        u32::from(t.hour()),
        u32::from(t.minute()),
        u32::from(t.second()),
    )
    .ok_or_else(|| DomainError::InvalidSchedule {
        reason: format!("Invalid time: {t}"),
    })
}

fn resolve_utc(tz: Tz, local: NaiveDateTime) -> Result<OffsetDateTime, DomainError> {
    let resolved = tz
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| DomainError::InvalidSchedule {
            reason: format!(
                "Local time {local} in {tz} is ambiguous or does not exist due to DST"
            ),
        })?;

    OffsetDateTime::from_unix_timestamp(resolved.timestamp()).map_err(|e| {
        DomainError::InvalidTimestamp {
            value: local.to_string(),
            error: e.to_string(),
        }
    })
}

/// Builds a UTC schedule from local times at a venue.
///
/// # Errors
///
/// - `DomainError::InvalidTimezone` if `timezone` is not an IANA zone
/// - `DomainError::InvalidSchedule` if a local time is ambiguous or
///   nonexistent, or the resulting schedule is invalid
pub fn schedule_from_local(
    timezone: &str,
    date: time::Date,
    start: time::Time,
    end: time::Time,
    break_minutes: u32,
) -> Result<EventSchedule, DomainError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;

    let start_date = to_naive_date(date)?;
    let start_time = to_naive_time(start)?;
    let end_time = to_naive_time(end)?;

    let end_date = if end_time <= start_time {
        start_date + Duration::days(1)
    } else {
        start_date
    };

    let start_utc = resolve_utc(tz, start_date.and_time(start_time))?;
    let end_utc = resolve_utc(tz, end_date.and_time(end_time))?;

    EventSchedule::new(start_utc, end_utc, break_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_local_evening_converts_to_utc() {
        let schedule = schedule_from_local(
            "America/New_York",
            date!(2026 - 06 - 01),
            time!(18:00),
            time!(23:00),
            30,
        )
        .unwrap();

        assert_eq!(schedule.start_time(), datetime!(2026-06-01 22:00 UTC));
        assert_eq!(schedule.end_time(), datetime!(2026-06-02 03:00 UTC));
        assert_eq!(schedule.break_minutes(), 30);
    }

    #[test]
    fn test_end_before_start_rolls_to_next_day() {
        let schedule = schedule_from_local(
            "UTC",
            date!(2026 - 06 - 01),
            time!(20:00),
            time!(02:00),
            0,
        )
        .unwrap();

        assert_eq!(schedule.start_time(), datetime!(2026-06-01 20:00 UTC));
        assert_eq!(schedule.end_time(), datetime!(2026-06-02 02:00 UTC));
    }

    #[test]
    fn test_nonexistent_local_time_is_rejected() {
        // 02:30 does not exist on the spring-forward date in New York.
        let result = schedule_from_local(
            "America/New_York",
            date!(2026 - 03 - 08),
            time!(02:30),
            time!(05:00),
            0,
        );
        assert!(matches!(result, Err(DomainError::InvalidSchedule { .. })));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let result = schedule_from_local(
            "Mars/Olympus_Mons",
            date!(2026 - 06 - 01),
            time!(18:00),
            time!(23:00),
            0,
        );
        assert_eq!(
            result,
            Err(DomainError::InvalidTimezone(String::from("Mars/Olympus_Mons")))
        );
    }
}
