//! Enrollment session intervals, the overlap rule, and lifecycle guards.

use chrono::NaiveDate;

use crate::calendar::{first_of_month, months_between};
use crate::error::CoreError;

/// Overlaps of up to this many whole months are tolerated when creating a
/// new enrollment. Exact-boundary re-enrollments (a student moving sections
/// mid-session) routinely share a month with the old enrollment; anything
/// longer double-bills the student.
pub const MAX_TOLERATED_OVERLAP_MONTHS: i32 = 1;

// ---------------------------------------------------------------------------
// Session intervals
// ---------------------------------------------------------------------------

/// A half-open session interval `[start, end)`, normalized to month starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SessionInterval {
    /// Build an interval from raw dates, truncating both to the first day
    /// of their month.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        let start = first_of_month(start);
        let end = first_of_month(end);
        if end <= start {
            return Err(CoreError::Validation(format!(
                "Session end {end} must be after session start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether two intervals share any time at all.
    pub fn intersects(&self, other: &SessionInterval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Length in whole months of the overlapping sub-interval, zero when
    /// the intervals are disjoint.
    pub fn overlap_months(&self, other: &SessionInterval) -> i32 {
        if !self.intersects(other) {
            return 0;
        }
        let overlap_start = self.start.max(other.start);
        let overlap_end = self.end.min(other.end);
        months_between(overlap_start, overlap_end)
    }
}

/// Reject `proposed` when it overlaps any existing session of the same
/// (student, section) pair by more than the tolerated number of months.
pub fn check_overlap<'a, I>(proposed: &SessionInterval, existing: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = &'a SessionInterval>,
{
    for interval in existing {
        let months = proposed.overlap_months(interval);
        if months > MAX_TOLERATED_OVERLAP_MONTHS {
            return Err(CoreError::OverlapConflict(format!(
                "Proposed session overlaps an existing enrollment by {months} months"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Lifecycle guards
// ---------------------------------------------------------------------------

/// The two lifecycle flags every fee-mutating operation re-checks.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleFlags {
    pub is_active: bool,
    pub is_complete: bool,
}

/// Complete enrollments are archived; no fee or payment mutation is allowed
/// until an administrator flips them back.
pub fn ensure_not_complete(flags: LifecycleFlags) -> Result<(), CoreError> {
    if flags.is_complete {
        return Err(CoreError::StateConflict(
            "Enrollment is complete and archived; update it to active to make changes".into(),
        ));
    }
    Ok(())
}

/// Fee resets additionally require the enrollment to be active.
pub fn ensure_active(flags: LifecycleFlags) -> Result<(), CoreError> {
    ensure_not_complete(flags)?;
    if !flags.is_active {
        return Err(CoreError::StateConflict(
            "Enrollment is not active; activate it first".into(),
        ));
    }
    Ok(())
}
