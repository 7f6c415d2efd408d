//! Fee payment receipt models.

use campus_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An immutable payment receipt row from the `fee_payments` table.
///
/// `original_balance` and `remaining_balance` snapshot the enrollment's
/// outstanding total immediately before and after the allocation. Receipts
/// are append-only; the only operation that removes them is the fee reset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeePayment {
    pub id: DbId,
    pub receipt_number: Uuid,
    pub enrollment_id: DbId,
    pub student_id: DbId,
    pub paid_amount: f64,
    pub original_balance: f64,
    pub remaining_balance: f64,
    pub paid_on: Timestamp,
}

// ---------------------------------------------------------------------------
// Operation DTO
// ---------------------------------------------------------------------------

/// Body for paying towards an enrollment's outstanding fees.
#[derive(Debug, Clone, Deserialize)]
pub struct PayFee {
    pub paid_amount: f64,
    /// Effective date stamped on fully settled fee rows; defaults to today.
    /// The receipt's own `paid_on` timestamp is always the processing time.
    pub paid_on: Option<NaiveDate>,
}

/// A page of receipts plus the total row count for the query.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentPage {
    pub payments: Vec<FeePayment>,
    pub total: i64,
}
