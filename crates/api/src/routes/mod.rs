pub mod classrooms;
pub mod employees;
pub mod health;
pub mod students;
pub mod vehicles;

use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, fees};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /students                                        create, search
/// /students/{id}                                   get, update, delete
/// /students/{id}/payments                          receipt history
/// /students/{student_id}/enrollments               create
/// /students/{student_id}/enrollments/{id}          details, update, delete
/// /students/{student_id}/enrollments/{id}/fees     ledger, generate, reset
/// /students/{student_id}/enrollments/{id}/payments pay fee
/// /students/{student_id}/enrollments/{id}/exams    exam entries
///
/// /classrooms                                      create, list
/// /classrooms/{id}                                 get, update, delete
/// /classrooms/{classroom_id}/sections              create, list
/// /classrooms/{classroom_id}/sections/{id}         update, delete, roster
///
/// /payments                                        date-range receipt report
///
/// /employees                                       create, list
/// /employees/{id}                                  get, update, delete
/// /employees/{id}/driver                           register driver
/// /employees/{id}/attendance                       stamp day, month view
/// /attendance/day                                  daily sheet
/// /attendance/holiday                              mark holiday
///
/// /vehicles                                        create, list
/// /vehicles/{id}                                   get, update, delete
/// /vehicles/{id}/location                          GPS ping
/// /vehicles/{id}/delink-driver                     unassign driver
///
/// /dashboard/stats                                 admin dashboard snapshot
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/students", students::students_router())
        .nest("/classrooms", classrooms::classrooms_router())
        .nest("/employees", employees::employees_router())
        .nest("/attendance", employees::attendance_router())
        .nest("/vehicles", vehicles::vehicles_router())
        .route("/payments", get(fees::payments_report))
        .route("/dashboard/stats", get(dashboard::get_dashboard_stats))
}
