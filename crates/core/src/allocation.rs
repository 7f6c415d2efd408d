//! Oldest-due-first payment allocation across an enrollment's fee ledger.
//!
//! One lump payment is distributed over the enrollment's monthly fee rows
//! in due-date order, settling the oldest arrears first. The walk runs on
//! in-memory [`FeeLine`]s; the repository persists the mutated lines inside
//! the same transaction that loaded them.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One monthly fee row as seen by the allocation walk.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeLine {
    pub id: DbId,
    pub due_date: NaiveDate,
    pub fee_due: f64,
    pub amount_paid: f64,
    pub balance: f64,
    pub paid_date: Option<NaiveDate>,
}

/// Balance snapshots taken around one allocation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationOutcome {
    /// Sum of the positive balances before the payment was applied.
    pub original_balance: f64,
    /// Sum of all balances after the payment was applied.
    pub remaining_balance: f64,
    /// Ids of the fee lines the walk mutated, in payment order.
    pub touched: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Allocation walk
// ---------------------------------------------------------------------------

/// Distribute `paid_amount` across `lines`, oldest due date first.
///
/// Lines with no outstanding balance are skipped. A line whose balance the
/// remaining payment covers is fully settled and stamped with
/// `effective_date`; otherwise the remainder is applied partially and the
/// walk stops. A payment exceeding the total outstanding balance fails
/// with [`CoreError::Overpayment`]; the caller must then discard every
/// mutation (roll the transaction back) so no partial application survives.
pub fn allocate(
    lines: &mut [FeeLine],
    paid_amount: f64,
    effective_date: NaiveDate,
) -> Result<AllocationOutcome, CoreError> {
    if !paid_amount.is_finite() || paid_amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Paid amount must be a positive number (got {paid_amount})"
        )));
    }

    lines.sort_by_key(|line| line.due_date);

    let original_balance: f64 = lines
        .iter()
        .filter(|line| line.balance > 0.0)
        .map(|line| line.balance)
        .sum();

    let mut remaining = paid_amount;
    let mut touched = Vec::new();

    for line in lines.iter_mut() {
        if line.balance <= 0.0 {
            continue;
        }

        if remaining >= line.balance {
            remaining -= line.balance;
            line.amount_paid += line.balance;
            line.balance = 0.0;
            line.paid_date = Some(effective_date);
        } else {
            line.amount_paid += remaining;
            line.balance -= remaining;
            remaining = 0.0;
        }
        touched.push(line.id);

        if remaining <= 0.0 {
            break;
        }
    }

    if remaining > 0.0 {
        return Err(CoreError::Overpayment {
            paid: paid_amount,
            outstanding: original_balance,
        });
    }

    let remaining_balance: f64 = lines.iter().map(|line| line.balance).sum();

    Ok(AllocationOutcome {
        original_balance,
        remaining_balance,
        touched,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn due(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, 1).unwrap()
    }

    fn line(id: DbId, month: u32, balance: f64) -> FeeLine {
        FeeLine {
            id,
            due_date: due(month),
            fee_due: balance,
            amount_paid: 0.0,
            balance,
            paid_date: None,
        }
    }

    fn effective() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn payment_settles_oldest_arrears_first() {
        let mut lines = vec![line(1, 1, 100.0), line(2, 2, 50.0), line(3, 3, 200.0)];

        let outcome = allocate(&mut lines, 130.0, effective()).unwrap();

        assert_eq!(lines[0].balance, 0.0);
        assert_eq!(lines[0].amount_paid, 100.0);
        assert_eq!(lines[0].paid_date, Some(effective()));

        assert_eq!(lines[1].balance, 20.0);
        assert_eq!(lines[1].amount_paid, 30.0);
        assert_eq!(lines[1].paid_date, None);

        assert_eq!(lines[2].balance, 200.0);
        assert_eq!(lines[2].amount_paid, 0.0);

        assert_eq!(outcome.original_balance, 350.0);
        assert_eq!(outcome.remaining_balance, 220.0);
        assert_eq!(outcome.touched, vec![1, 2]);
    }

    #[test]
    fn walk_sorts_unordered_input_by_due_date() {
        let mut lines = vec![line(3, 3, 200.0), line(1, 1, 100.0), line(2, 2, 50.0)];

        let outcome = allocate(&mut lines, 150.0, effective()).unwrap();

        // Jan and Feb settled in full, Mar untouched.
        assert_eq!(outcome.touched, vec![1, 2]);
        assert_eq!(lines.iter().find(|l| l.id == 3).unwrap().balance, 200.0);
    }

    #[test]
    fn exact_payment_clears_everything() {
        let mut lines = vec![line(1, 1, 100.0), line(2, 2, 50.0)];

        let outcome = allocate(&mut lines, 150.0, effective()).unwrap();

        assert!(lines.iter().all(|l| l.balance == 0.0));
        assert!(lines.iter().all(|l| l.paid_date == Some(effective())));
        assert_eq!(outcome.remaining_balance, 0.0);
    }

    #[test]
    fn settled_lines_are_skipped() {
        let mut paid_off = line(1, 1, 0.0);
        paid_off.amount_paid = 100.0;
        paid_off.fee_due = 100.0;
        let mut lines = vec![paid_off, line(2, 2, 80.0)];

        let outcome = allocate(&mut lines, 80.0, effective()).unwrap();

        assert_eq!(outcome.touched, vec![2]);
        assert_eq!(lines[0].amount_paid, 100.0);
        assert_eq!(lines[1].balance, 0.0);
    }

    #[test]
    fn overpayment_fails_with_the_original_outstanding_total() {
        let mut lines = vec![line(1, 1, 100.0), line(2, 2, 50.0), line(3, 3, 200.0)];

        let err = allocate(&mut lines, 400.0, effective()).unwrap_err();

        assert_matches!(
            err,
            CoreError::Overpayment { paid, outstanding }
                if paid == 400.0 && outstanding == 350.0
        );
    }

    #[test]
    fn payment_into_settled_ledger_is_an_overpayment() {
        let mut lines = vec![line(1, 1, 0.0), line(2, 2, 0.0)];

        assert_matches!(
            allocate(&mut lines, 10.0, effective()),
            Err(CoreError::Overpayment { .. })
        );
    }

    #[test]
    fn empty_ledger_is_an_overpayment() {
        let mut lines: Vec<FeeLine> = Vec::new();
        assert_matches!(
            allocate(&mut lines, 10.0, effective()),
            Err(CoreError::Overpayment { .. })
        );
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        let mut lines = vec![line(1, 1, 100.0)];
        assert_matches!(
            allocate(&mut lines, 0.0, effective()),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            allocate(&mut lines, -25.0, effective()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn nan_amount_is_rejected() {
        let mut lines = vec![line(1, 1, 100.0)];
        assert_matches!(
            allocate(&mut lines, f64::NAN, effective()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn partial_payment_touches_only_the_first_open_line() {
        let mut lines = vec![line(1, 1, 100.0), line(2, 2, 50.0)];

        let outcome = allocate(&mut lines, 40.0, effective()).unwrap();

        assert_eq!(outcome.touched, vec![1]);
        assert_eq!(lines[0].amount_paid, 40.0);
        assert_eq!(lines[0].balance, 60.0);
        assert_eq!(lines[0].paid_date, None);
        assert_eq!(outcome.remaining_balance, 110.0);
    }

    #[test]
    fn original_balance_ignores_negative_balances() {
        // A row driven negative by an earlier manual correction must not
        // reduce the outstanding snapshot.
        let mut corrected = line(1, 1, -30.0);
        corrected.fee_due = 100.0;
        corrected.amount_paid = 130.0;
        let mut lines = vec![corrected, line(2, 2, 50.0)];

        let outcome = allocate(&mut lines, 50.0, effective()).unwrap();

        assert_eq!(outcome.original_balance, 50.0);
        // The post-walk sum still counts every balance, negatives included.
        assert_eq!(outcome.remaining_balance, -30.0);
        assert_eq!(outcome.touched, vec![2]);
    }
}
