//! Integration tests for the monthly fee ledger and payment allocator.
//!
//! Exercises the transactional operations against a real database:
//! - Oldest-due-first allocation across the ledger
//! - Overpayment as an atomic no-op
//! - Lifecycle guards on pay and reset
//! - The destructive reset
//! - Serialization of concurrent payments on one enrollment

use assert_matches::assert_matches;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use campus_db::error::RepoError;
use campus_db::models::classroom::CreateClassroom;
use campus_db::models::class_section::CreateClassSection;
use campus_db::models::enrollment::{CreateEnrollment, Enrollment, UpdateEnrollment};
use campus_db::models::fee_payment::PayFee;
use campus_db::models::monthly_fee::ResetFees;
use campus_db::models::student::CreateStudent;
use campus_db::repositories::{
    ClassSectionRepo, ClassroomRepo, EnrollmentRepo, FeeLedgerRepo, FeePaymentRepo, StudentRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn d(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn new_student(name: &str) -> CreateStudent {
    CreateStudent {
        name: name.to_string(),
        search_name: name.to_lowercase(),
        address: "12 Hill Road".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2012, 6, 14).unwrap(),
        father_name: "Ramesh".to_string(),
        mother_name: "Sita".to_string(),
        father_phone: Some("9800000001".to_string()),
        mother_phone: None,
        identity_documents: None,
    }
}

/// Create a student enrolled Jan..Jul 2024 in a fresh classroom section.
async fn seed_enrollment(pool: &PgPool) -> Enrollment {
    let student = StudentRepo::create(pool, &new_student("Asha")).await.unwrap();
    let classroom = ClassroomRepo::create(
        pool,
        &CreateClassroom { name: "Grade 5".to_string(), is_active: None },
    )
    .await
    .unwrap();
    let section = ClassSectionRepo::create(
        pool,
        classroom.id,
        &CreateClassSection {
            name: "A".to_string(),
            default_fee: 100.0,
            subjects: None,
            is_active: None,
        },
    )
    .await
    .unwrap();

    EnrollmentRepo::create(
        pool,
        student.id,
        &CreateEnrollment {
            section_id: section.id,
            session_start: d(2024, 1),
            session_end: d(2024, 7),
            monthly_fee: Some(100.0),
            is_active: None,
        },
    )
    .await
    .unwrap()
}

/// Insert one unpaid fee row with the given balance.
async fn insert_fee(pool: &PgPool, enrollment_id: DbId, due: NaiveDate, balance: f64) -> DbId {
    let (id,): (DbId,) = sqlx::query_as(
        "INSERT INTO monthly_fees (enrollment_id, due_date, fee_due, amount_paid, balance)
         VALUES ($1, $2, $3, 0, $3)
         RETURNING id",
    )
    .bind(enrollment_id)
    .bind(due)
    .bind(balance)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

/// Three-period ledger with balances 100, 50, 200 in due-date order.
async fn seed_ledger(pool: &PgPool, enrollment_id: DbId) -> Vec<DbId> {
    let mut ids = Vec::new();
    for (month, balance) in [(1, 100.0), (2, 50.0), (3, 200.0)] {
        ids.push(insert_fee(pool, enrollment_id, d(2024, month), balance).await);
    }
    ids
}

fn pay(amount: f64) -> PayFee {
    PayFee { paid_amount: amount, paid_on: None }
}

// ---------------------------------------------------------------------------
// Test: allocation is order-correct
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_settles_oldest_arrears_first(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    let receipt = FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(130.0))
        .await
        .unwrap();

    assert_eq!(receipt.original_balance, 350.0);
    assert_eq!(receipt.remaining_balance, 220.0);
    assert_eq!(receipt.paid_amount, 130.0);

    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    assert_eq!(ledger.len(), 3);

    // Jan fully settled.
    assert_eq!(ledger[0].balance, 0.0);
    assert_eq!(ledger[0].amount_paid, 100.0);
    assert!(ledger[0].paid_date.is_some());

    // Feb partially settled; not stamped paid.
    assert_eq!(ledger[1].balance, 20.0);
    assert_eq!(ledger[1].amount_paid, 30.0);
    assert!(ledger[1].paid_date.is_none());

    // Mar untouched.
    assert_eq!(ledger[2].balance, 200.0);
    assert_eq!(ledger[2].amount_paid, 0.0);
}

// ---------------------------------------------------------------------------
// Test: overpayment is an atomic no-op
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overpayment_rolls_back_everything(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    let err = FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(400.0))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Domain(CoreError::Overpayment { paid, outstanding })
            if paid == 400.0 && outstanding == 350.0
    );

    // Re-read: every balance is exactly as seeded, nothing allocated.
    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    let balances: Vec<f64> = ledger.iter().map(|fee| fee.balance).collect();
    assert_eq!(balances, vec![100.0, 50.0, 200.0]);
    assert!(ledger.iter().all(|fee| fee.amount_paid == 0.0));
    assert!(ledger.iter().all(|fee| fee.paid_date.is_none()));

    let receipts = FeePaymentRepo::count_for_enrollment(&pool, enrollment.id)
        .await
        .unwrap();
    assert_eq!(receipts, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_into_settled_ledger_is_overpayment(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    // Settle everything, then pay again.
    FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(350.0))
        .await
        .unwrap();
    let err = FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(1.0))
        .await
        .unwrap_err();

    assert_matches!(err, RepoError::Domain(CoreError::Overpayment { .. }));
}

// ---------------------------------------------------------------------------
// Test: precondition guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pay_on_complete_enrollment_is_rejected(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    EnrollmentRepo::update(
        &pool,
        enrollment.student_id,
        enrollment.id,
        &UpdateEnrollment { is_active: None, is_complete: Some(true), one_time_fee: None },
    )
    .await
    .unwrap();

    let err = FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(50.0))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StateConflict(_)));

    // Nothing mutated.
    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    assert!(ledger.iter().all(|fee| fee.amount_paid == 0.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pay_for_unknown_enrollment_is_not_found(pool: PgPool) {
    let err = FeeLedgerRepo::pay(&pool, 1, 9999, &pay(50.0)).await.unwrap_err();
    assert_matches!(
        err,
        RepoError::Domain(CoreError::NotFound { entity: "Enrollment", .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pay_by_unknown_student_is_not_found(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    let err = FeeLedgerRepo::pay(&pool, 9999, enrollment.id, &pay(50.0))
        .await
        .unwrap_err();
    assert_matches!(
        err,
        RepoError::Domain(CoreError::NotFound { entity: "Student", .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pay_by_disabled_student_is_rejected(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    sqlx::query("UPDATE students SET is_active = FALSE WHERE id = $1")
        .bind(enrollment.student_id)
        .execute(&pool)
        .await
        .unwrap();

    let err = FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(50.0))
        .await
        .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StateConflict(_)));
}

// ---------------------------------------------------------------------------
// Test: effective date vs receipt timestamp
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_effective_date_stamps_rows_but_not_receipt(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    let effective = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
    let receipt = FeeLedgerRepo::pay(
        &pool,
        enrollment.student_id,
        enrollment.id,
        &PayFee { paid_amount: 100.0, paid_on: Some(effective) },
    )
    .await
    .unwrap();

    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    assert_eq!(ledger[0].paid_date, Some(effective));

    // The receipt records processing time, not the caller's effective date.
    assert_eq!(receipt.paid_on.date_naive(), Utc::now().date_naive());
}

// ---------------------------------------------------------------------------
// Test: ledger generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generate_creates_one_row_per_session_month(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;

    let ledger = FeeLedgerRepo::generate(&pool, enrollment.student_id, enrollment.id)
        .await
        .unwrap();

    // Jan..Jul 2024 is six billing periods.
    assert_eq!(ledger.len(), 6);
    assert_eq!(ledger[0].due_date, d(2024, 1));
    assert_eq!(ledger[5].due_date, d(2024, 6));
    assert!(ledger.iter().all(|fee| fee.fee_due == 100.0));
    assert!(ledger.iter().all(|fee| fee.balance == 100.0));
    assert!(ledger.iter().all(|fee| fee.amount_paid == 0.0));

    // Re-running leaves the ledger unchanged.
    let again = FeeLedgerRepo::generate(&pool, enrollment.student_id, enrollment.id)
        .await
        .unwrap();
    assert_eq!(again.len(), 6);
}

// ---------------------------------------------------------------------------
// Test: reset clears history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_clears_payments_and_receipts(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay(150.0))
        .await
        .unwrap();
    assert_eq!(
        FeePaymentRepo::count_for_enrollment(&pool, enrollment.id).await.unwrap(),
        1
    );

    FeeLedgerRepo::reset(
        &pool,
        enrollment.student_id,
        enrollment.id,
        &ResetFees { new_fee_amount: None },
    )
    .await
    .unwrap();

    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    for fee in &ledger {
        assert_eq!(fee.amount_paid, 0.0);
        assert_eq!(fee.balance, fee.fee_due);
        assert!(fee.paid_date.is_none());
    }
    assert_eq!(
        FeePaymentRepo::count_for_enrollment(&pool, enrollment.id).await.unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_with_override_replaces_fee_due(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    FeeLedgerRepo::reset(
        &pool,
        enrollment.student_id,
        enrollment.id,
        &ResetFees { new_fee_amount: Some(75.0) },
    )
    .await
    .unwrap();

    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    assert!(ledger.iter().all(|fee| fee.fee_due == 75.0));
    assert!(ledger.iter().all(|fee| fee.balance == 75.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_requires_active_enrollment(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    EnrollmentRepo::update(
        &pool,
        enrollment.student_id,
        enrollment.id,
        &UpdateEnrollment { is_active: Some(false), is_complete: None, one_time_fee: None },
    )
    .await
    .unwrap();

    let err = FeeLedgerRepo::reset(
        &pool,
        enrollment.student_id,
        enrollment.id,
        &ResetFees { new_fee_amount: None },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::StateConflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_by_wrong_student_is_forbidden(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    seed_ledger(&pool, enrollment.id).await;

    let stranger = StudentRepo::create(&pool, &new_student("Bina")).await.unwrap();

    let err = FeeLedgerRepo::reset(
        &pool,
        stranger.id,
        enrollment.id,
        &ResetFees { new_fee_amount: None },
    )
    .await
    .unwrap_err();
    assert_matches!(err, RepoError::Domain(CoreError::Forbidden(_)));
}

// ---------------------------------------------------------------------------
// Test: concurrent payments serialize
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_payments_do_not_double_allocate(pool: PgPool) {
    let enrollment = seed_enrollment(&pool).await;
    insert_fee(&pool, enrollment.id, d(2024, 1), 100.0).await;
    insert_fee(&pool, enrollment.id, d(2024, 2), 100.0).await;

    // Both payments fit inside the outstanding 200, so each must succeed
    // exactly once whatever order the row locks serialize them in.
    let pay_80 = pay(80.0);
    let pay_90 = pay(90.0);
    let (first, second) = tokio::join!(
        FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay_80),
        FeeLedgerRepo::pay(&pool, enrollment.student_id, enrollment.id, &pay_90),
    );
    first.unwrap();
    second.unwrap();

    let ledger = FeeLedgerRepo::list(&pool, enrollment.id).await.unwrap();
    let total_paid: f64 = ledger.iter().map(|fee| fee.amount_paid).sum();
    let total_balance: f64 = ledger.iter().map(|fee| fee.balance).sum();
    assert_eq!(total_paid, 170.0);
    assert_eq!(total_balance, 30.0);

    assert_eq!(
        FeePaymentRepo::count_for_enrollment(&pool, enrollment.id).await.unwrap(),
        2
    );
}
