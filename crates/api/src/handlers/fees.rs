//! Handlers for the monthly fee ledger and payment receipts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use campus_core::types::DbId;
use campus_db::models::fee_payment::PayFee;
use campus_db::models::monthly_fee::ResetFees;
use campus_db::repositories::{FeeLedgerRepo, FeePaymentRepo};

use crate::error::AppResult;
use crate::query::validated;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for the payments report.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentsReportParams {
    pub start_date: NaiveDate,
    /// Defaults to `start_date`, giving a single-day report.
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 1))]
    pub page: i64,
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    #[serde(default)]
    pub ascending: bool,
}

// ---------------------------------------------------------------------------
// GET /students/{student_id}/enrollments/{enrollment_id}/fees
// ---------------------------------------------------------------------------

/// List the enrollment's fee ledger, oldest period first.
pub async fn list_fees(
    State(state): State<AppState>,
    Path((_student_id, enrollment_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let ledger = FeeLedgerRepo::list(&state.pool, enrollment_id).await?;

    Ok(Json(DataResponse { data: ledger }))
}

// ---------------------------------------------------------------------------
// POST /students/{student_id}/enrollments/{enrollment_id}/fees/generate
// ---------------------------------------------------------------------------

/// Populate the ledger with one row per session month.
///
/// Re-runnable: months that already have a row are left untouched.
pub async fn generate_fees(
    State(state): State<AppState>,
    Path((student_id, enrollment_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let ledger = FeeLedgerRepo::generate(&state.pool, student_id, enrollment_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: ledger })))
}

// ---------------------------------------------------------------------------
// POST /students/{student_id}/enrollments/{enrollment_id}/fees/reset
// ---------------------------------------------------------------------------

/// Reset the ledger to its unpaid state, deleting every receipt.
pub async fn reset_fees(
    State(state): State<AppState>,
    Path((student_id, enrollment_id)): Path<(DbId, DbId)>,
    Json(body): Json<ResetFees>,
) -> AppResult<impl IntoResponse> {
    FeeLedgerRepo::reset(&state.pool, student_id, enrollment_id, &body).await?;

    Ok(Json(DataResponse { data: true }))
}

// ---------------------------------------------------------------------------
// POST /students/{student_id}/enrollments/{enrollment_id}/payments
// ---------------------------------------------------------------------------

/// Pay towards the enrollment's outstanding fees.
///
/// The amount is distributed oldest-due-first; an amount exceeding the
/// total outstanding balance is rejected with nothing applied. Returns the
/// receipt on success.
pub async fn pay_fee(
    State(state): State<AppState>,
    Path((student_id, enrollment_id)): Path<(DbId, DbId)>,
    Json(body): Json<PayFee>,
) -> AppResult<impl IntoResponse> {
    let receipt = FeeLedgerRepo::pay(&state.pool, student_id, enrollment_id, &body).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

// ---------------------------------------------------------------------------
// GET /payments
// ---------------------------------------------------------------------------

/// Page through receipts collected in a date range.
pub async fn payments_report(
    State(state): State<AppState>,
    Query(params): Query<PaymentsReportParams>,
) -> AppResult<impl IntoResponse> {
    let params = validated(params)?;
    let end_date = params.end_date.unwrap_or(params.start_date);

    let page = FeePaymentRepo::list_between(
        &state.pool,
        params.start_date,
        end_date,
        params.limit,
        (params.page - 1) * params.limit,
        params.ascending,
    )
    .await?;

    Ok(Json(DataResponse { data: page }))
}
