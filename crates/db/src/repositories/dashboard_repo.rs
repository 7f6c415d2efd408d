//! Aggregation queries backing the admin dashboard.

use campus_core::calendar::{first_of_month, last_of_month};
use chrono::{Days, NaiveDate};
use sqlx::PgPool;

use crate::models::dashboard::DashboardStats;

/// Provides the dashboard counts and money totals.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Compute the dashboard snapshot relative to `current_date`.
    pub async fn stats(
        pool: &PgPool,
        current_date: NaiveDate,
    ) -> Result<DashboardStats, sqlx::Error> {
        let thirty_days_ago = current_date
            .checked_sub_days(Days::new(29))
            .unwrap_or(current_date);
        let month_start = first_of_month(current_date);
        let month_end = last_of_month(current_date);

        let (active_employees,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM employees WHERE is_active = TRUE")
                .fetch_one(pool)
                .await?;

        let (registered_students,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM students")
                .fetch_one(pool)
                .await?;

        let (active_students,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM students WHERE is_active = TRUE")
                .fetch_one(pool)
                .await?;

        let (enrollments_last_thirty_days,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM enrollments
             WHERE created_at::date >= $1 AND created_at::date <= $2",
        )
        .bind(thirty_days_ago)
        .bind(current_date)
        .fetch_one(pool)
        .await?;

        let (active_enrollments,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM enrollments WHERE is_active = TRUE")
                .fetch_one(pool)
                .await?;

        let (vehicles,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
            .fetch_one(pool)
            .await?;

        let (total_due_payment,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(balance), 0)::double precision FROM monthly_fees
             WHERE balance > 0 AND due_date <= $1",
        )
        .bind(month_end)
        .fetch_one(pool)
        .await?;

        let (fees_collected_this_month,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(paid_amount), 0)::double precision FROM fee_payments
             WHERE paid_on::date >= $1 AND paid_on::date <= $2",
        )
        .bind(month_start)
        .bind(month_end)
        .fetch_one(pool)
        .await?;

        Ok(DashboardStats {
            active_employees,
            registered_students,
            active_students,
            enrollments_last_thirty_days,
            active_enrollments,
            vehicles,
            total_due_payment,
            fees_collected_this_month,
        })
    }
}
