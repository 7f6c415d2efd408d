//! Handler for the admin dashboard snapshot.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use campus_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reference date for the dashboard windows (30-day enrollment window,
/// current billing month).
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub current_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// GET /dashboard/stats
// ---------------------------------------------------------------------------

/// Counts and money totals for the admin dashboard.
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<impl IntoResponse> {
    let stats = DashboardRepo::stats(&state.pool, params.current_date).await?;

    Ok(Json(DataResponse { data: stats }))
}
