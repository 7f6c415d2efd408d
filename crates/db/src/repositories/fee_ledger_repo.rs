//! Repository for the `monthly_fees` ledger and the payment allocator.
//!
//! Every mutating operation here runs in a single transaction and re-checks
//! the enrollment lifecycle guards, so concurrent requests against the same
//! enrollment serialize on the row locks and never observe half-applied
//! payments.

use campus_core::allocation::{self, FeeLine};
use campus_core::calendar::months_in_span;
use campus_core::enrollment::{self, LifecycleFlags};
use campus_core::error::CoreError;
use campus_core::types::DbId;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::RepoResult;
use crate::models::enrollment::Enrollment;
use crate::models::fee_payment::{FeePayment, PayFee};
use crate::models::monthly_fee::{MonthlyFee, ResetFees};
use crate::repositories::enrollment_repo::EnrollmentRepo;

/// Column list for monthly_fees queries.
pub(crate) const FEE_COLUMNS: &str =
    "id, enrollment_id, due_date, fee_due, amount_paid, balance, paid_date";

/// Column list for fee_payments queries.
pub(crate) const PAYMENT_COLUMNS: &str = "id, receipt_number, enrollment_id, student_id, \
    paid_amount, original_balance, remaining_balance, paid_on";

fn flags(enrollment: &Enrollment) -> LifecycleFlags {
    LifecycleFlags {
        is_active: enrollment.is_active,
        is_complete: enrollment.is_complete,
    }
}

fn ensure_owned_by(enrollment: &Enrollment, student_id: DbId) -> Result<(), CoreError> {
    if enrollment.student_id != student_id {
        return Err(CoreError::Forbidden(
            "Enrollment does not belong to the specified student".into(),
        ));
    }
    Ok(())
}

/// Provides the monthly fee ledger operations: generate, reset, and pay.
pub struct FeeLedgerRepo;

impl FeeLedgerRepo {
    /// List an enrollment's fee ledger, oldest period first.
    pub async fn list(
        pool: &PgPool,
        enrollment_id: DbId,
    ) -> Result<Vec<MonthlyFee>, sqlx::Error> {
        let query = format!(
            "SELECT {FEE_COLUMNS} FROM monthly_fees
             WHERE enrollment_id = $1
             ORDER BY due_date"
        );
        sqlx::query_as::<_, MonthlyFee>(&query)
            .bind(enrollment_id)
            .fetch_all(pool)
            .await
    }

    /// Populate the ledger with one row per month of the session interval.
    ///
    /// Months that already have a row are left untouched, so the operation
    /// can be re-run after a session extension. Requires the enrollment to
    /// be active and not complete.
    pub async fn generate(
        pool: &PgPool,
        student_id: DbId,
        enrollment_id: DbId,
    ) -> RepoResult<Vec<MonthlyFee>> {
        let mut tx = pool.begin().await?;

        let enrollment = EnrollmentRepo::lock(&mut tx, enrollment_id).await?;
        ensure_owned_by(&enrollment, student_id)?;
        enrollment::ensure_active(flags(&enrollment))?;

        for due_date in months_in_span(enrollment.session_start, enrollment.session_end) {
            sqlx::query(
                "INSERT INTO monthly_fees (enrollment_id, due_date, fee_due, amount_paid, balance)
                 VALUES ($1, $2, $3, 0, $3)
                 ON CONFLICT (enrollment_id, due_date) DO NOTHING",
            )
            .bind(enrollment_id)
            .bind(due_date)
            .bind(enrollment.monthly_fee)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "SELECT {FEE_COLUMNS} FROM monthly_fees
             WHERE enrollment_id = $1
             ORDER BY due_date"
        );
        let ledger = sqlx::query_as::<_, MonthlyFee>(&query)
            .bind(enrollment_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ledger)
    }

    /// Reset an enrollment's ledger to its unpaid state.
    ///
    /// Deletes every payment receipt for the enrollment and restores each
    /// fee row to `amount_paid = 0`, `balance = fee_due` (optionally
    /// overriding `fee_due`), `paid_date = NULL`. Destructive: the receipt
    /// history is not archived.
    pub async fn reset(
        pool: &PgPool,
        student_id: DbId,
        enrollment_id: DbId,
        input: &ResetFees,
    ) -> RepoResult<()> {
        if let Some(amount) = input.new_fee_amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(CoreError::Validation(format!(
                    "New fee amount must be non-negative (got {amount})"
                ))
                .into());
            }
        }

        let mut tx = pool.begin().await?;

        let enrollment = EnrollmentRepo::lock(&mut tx, enrollment_id).await?;
        ensure_owned_by(&enrollment, student_id)?;
        enrollment::ensure_active(flags(&enrollment))?;

        let purged = sqlx::query("DELETE FROM fee_payments WHERE enrollment_id = $1")
            .bind(enrollment_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query(
            "UPDATE monthly_fees SET
                fee_due = COALESCE($2, fee_due),
                amount_paid = 0,
                balance = COALESCE($2, fee_due),
                paid_date = NULL
             WHERE enrollment_id = $1",
        )
        .bind(enrollment_id)
        .bind(input.new_fee_amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(enrollment_id, student_id, purged, "Fee ledger reset");
        Ok(())
    }

    /// Pay towards an enrollment's outstanding fees, oldest period first.
    ///
    /// Precondition order: enrollment exists, enrollment not complete,
    /// student exists, student active. The fee rows are locked for the
    /// duration of the transaction; on any failure (including overpayment)
    /// the transaction rolls back and no allocation is observable. Returns
    /// the receipt created for the payment.
    pub async fn pay(
        pool: &PgPool,
        student_id: DbId,
        enrollment_id: DbId,
        input: &PayFee,
    ) -> RepoResult<FeePayment> {
        let mut tx = pool.begin().await?;

        let enrollment = EnrollmentRepo::lock(&mut tx, enrollment_id).await?;
        enrollment::ensure_not_complete(flags(&enrollment))?;

        let student: Option<(bool,)> =
            sqlx::query_as("SELECT is_active FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_optional(&mut *tx)
                .await?;
        let (student_active,) =
            student.ok_or(CoreError::NotFound { entity: "Student", id: student_id })?;
        if !student_active {
            return Err(CoreError::StateConflict(
                "Student is disabled; activate them first".into(),
            )
            .into());
        }

        let query = format!(
            "SELECT {FEE_COLUMNS} FROM monthly_fees
             WHERE enrollment_id = $1
             ORDER BY due_date
             FOR UPDATE"
        );
        let ledger = sqlx::query_as::<_, MonthlyFee>(&query)
            .bind(enrollment_id)
            .fetch_all(&mut *tx)
            .await?;

        let mut lines: Vec<FeeLine> = ledger.iter().map(MonthlyFee::to_fee_line).collect();
        let effective_date = input.paid_on.unwrap_or_else(|| Utc::now().date_naive());

        // An overpayment error here drops the transaction, rolling back the
        // row locks with nothing written.
        let outcome = allocation::allocate(&mut lines, input.paid_amount, effective_date)?;

        for line in lines.iter().filter(|line| outcome.touched.contains(&line.id)) {
            sqlx::query(
                "UPDATE monthly_fees SET amount_paid = $1, balance = $2, paid_date = $3
                 WHERE id = $4",
            )
            .bind(line.amount_paid)
            .bind(line.balance)
            .bind(line.paid_date)
            .bind(line.id)
            .execute(&mut *tx)
            .await?;
        }

        // The receipt's own timestamp is the processing time; the effective
        // date above only stamps the settled fee rows.
        let receipt_query = format!(
            "INSERT INTO fee_payments
                (receipt_number, enrollment_id, student_id, paid_amount,
                 original_balance, remaining_balance, paid_on)
             VALUES ($1, $2, $3, $4, $5, $6, NOW())
             RETURNING {PAYMENT_COLUMNS}"
        );
        let receipt = sqlx::query_as::<_, FeePayment>(&receipt_query)
            .bind(Uuid::new_v4())
            .bind(enrollment_id)
            .bind(student_id)
            .bind(input.paid_amount)
            .bind(outcome.original_balance)
            .bind(outcome.remaining_balance)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            enrollment_id,
            student_id,
            paid_amount = input.paid_amount,
            remaining_balance = receipt.remaining_balance,
            "Fee payment allocated"
        );
        Ok(receipt)
    }
}
