/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates with no time-of-day component (due dates, session bounds).
pub type DateOnly = chrono::NaiveDate;
