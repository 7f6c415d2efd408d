//! Month arithmetic for session intervals and the fee ledger.
//!
//! All billing runs at month granularity: session bounds and due dates are
//! stored as the first day of their month, and distances are measured in
//! whole months.

use chrono::{Datelike, NaiveDate};

/// Truncate a date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("day 1 exists in every month")
}

/// Whole months from `start` to `end`.
///
/// Computed from the year/month components only; day-of-month is ignored.
/// Negative when `end` is in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// First day of the month following `date`'s month.
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month")
}

/// First-of-month dates for every month in the half-open span `[start, end)`.
pub fn months_in_span(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let end = first_of_month(end);
    let mut cursor = first_of_month(start);
    let mut months = Vec::new();
    while cursor < end {
        months.push(cursor);
        cursor = next_month(cursor);
    }
    months
}

/// Last day of `date`'s month.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    next_month(date).pred_opt().expect("month start has a predecessor")
}
