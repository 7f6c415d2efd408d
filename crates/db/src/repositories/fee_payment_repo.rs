//! Repository for reading the append-only `fee_payments` table.

use campus_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::fee_payment::{FeePayment, PaymentPage};
use crate::repositories::fee_ledger_repo::PAYMENT_COLUMNS;

/// Provides paginated receipt queries; receipts are only ever written by
/// the payment allocator.
pub struct FeePaymentRepo;

impl FeePaymentRepo {
    /// Page through a student's receipts, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<PaymentPage, sqlx::Error> {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM fee_payments
             WHERE student_id = $1
             ORDER BY paid_on DESC
             LIMIT $2 OFFSET $3"
        );
        let payments = sqlx::query_as::<_, FeePayment>(&query)
            .bind(student_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fee_payments WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(pool)
                .await?;

        Ok(PaymentPage { payments, total })
    }

    /// Page through receipts whose payment date falls in `[start, end]`.
    pub async fn list_between(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
        limit: i64,
        offset: i64,
        ascending: bool,
    ) -> Result<PaymentPage, sqlx::Error> {
        let order = if ascending { "ASC" } else { "DESC" };
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM fee_payments
             WHERE paid_on::date >= $1 AND paid_on::date <= $2
             ORDER BY paid_on {order}
             LIMIT $3 OFFSET $4"
        );
        let payments = sqlx::query_as::<_, FeePayment>(&query)
            .bind(start)
            .bind(end)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM fee_payments
             WHERE paid_on::date >= $1 AND paid_on::date <= $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

        Ok(PaymentPage { payments, total })
    }

    /// Count receipts for an enrollment.
    pub async fn count_for_enrollment(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fee_payments WHERE enrollment_id = $1")
                .bind(enrollment_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
