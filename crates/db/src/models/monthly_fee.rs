//! Monthly fee ledger models.

use campus_core::allocation::FeeLine;
use campus_core::types::DbId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One billing-period row from the `monthly_fees` table.
///
/// Invariants maintained by the ledger operations: `balance >= 0`,
/// `balance = fee_due - amount_paid`, and `paid_date` is set exactly when
/// `balance == 0`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlyFee {
    pub id: DbId,
    pub enrollment_id: DbId,
    pub due_date: NaiveDate,
    pub fee_due: f64,
    pub amount_paid: f64,
    pub balance: f64,
    pub paid_date: Option<NaiveDate>,
}

impl MonthlyFee {
    /// View of this row for the allocation walk.
    pub fn to_fee_line(&self) -> FeeLine {
        FeeLine {
            id: self.id,
            due_date: self.due_date,
            fee_due: self.fee_due,
            amount_paid: self.amount_paid,
            balance: self.balance,
            paid_date: self.paid_date,
        }
    }
}

// ---------------------------------------------------------------------------
// Operation DTOs
// ---------------------------------------------------------------------------

/// Body for the destructive fee reset.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetFees {
    /// Replacement `fee_due` for every period; absent keeps each row's
    /// existing amount.
    pub new_fee_amount: Option<f64>,
}
