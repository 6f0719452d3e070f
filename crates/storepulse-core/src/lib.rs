//! Foundational low-level utilities shared across StorePulse crates.
//!
//! Provides the wall clock plus the calendar helpers used to bucket
//! conversations by local day and to compute the reporting window.

pub mod report_calendar;
pub mod time_utils;

pub use report_calendar::{
    current_month_window, day_month_label, local_date_from_unix_ms, parse_report_timezone,
    ReportWindow, TimeWindowError,
};
pub use time_utils::{current_unix_timestamp_ms, elapsed_ms_since};
