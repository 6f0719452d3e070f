//! Calendar helpers for report bucketing.
//!
//! Conversations are bucketed by the full local calendar date in the report
//! timezone. The `dd/mm` label is presentation only, so ordering stays correct
//! across a year boundary.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `TimeWindowError` values.
pub enum TimeWindowError {
    #[error("unknown report timezone '{0}'")]
    UnknownTimezone(String),
    #[error("start of month {date} has no valid local midnight in {timezone}")]
    MonthStartUnavailable { date: NaiveDate, timezone: String },
}

/// Inclusive `[from, to]` window in Unix milliseconds sent to the upstream fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub from_unix_ms: i64,
    pub to_unix_ms: i64,
}

/// Parses an IANA timezone name such as `America/Santiago`.
pub fn parse_report_timezone(raw: &str) -> Result<Tz, TimeWindowError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<Tz>()
        .map_err(|_| TimeWindowError::UnknownTimezone(trimmed.to_string()))
}

/// Local calendar date of a Unix-millisecond timestamp, or `None` when the
/// timestamp is outside chrono's representable range.
pub fn local_date_from_unix_ms(unix_ms: i64, timezone: Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(unix_ms)
        .map(|instant| instant.with_timezone(&timezone).date_naive())
}

/// Day/month label shown on the dashboard axis, e.g. `07/03`.
pub fn day_month_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Window from local midnight on the first day of `now`'s month up to `now`.
pub fn current_month_window(
    now: DateTime<Utc>,
    timezone: Tz,
) -> Result<ReportWindow, TimeWindowError> {
    let local_today = now.with_timezone(&timezone).date_naive();
    let first_of_month = local_today.with_day(1).unwrap_or(local_today);
    let unavailable = || TimeWindowError::MonthStartUnavailable {
        date: first_of_month,
        timezone: timezone.name().to_string(),
    };

    let midnight = first_of_month.and_hms_opt(0, 0, 0).ok_or_else(unavailable)?;
    // Zones that shift DST at midnight skip 00:00; the first valid instant is an hour later.
    let start = timezone
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            timezone
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .ok_or_else(unavailable)?;

    Ok(ReportWindow {
        from_unix_ms: start.timestamp_millis(),
        to_unix_ms: now.timestamp_millis(),
    })
}
