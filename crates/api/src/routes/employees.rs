//! Route definitions for employees, drivers, and attendance.
//!
//! ```text
//! EMPLOYEES:
//! POST   /                       create_employee
//! GET    /                       list_employees (?page&limit)
//! GET    /{id}                   get_employee
//! PATCH  /{id}                   update_employee
//! DELETE /{id}                   delete_employee
//! POST   /{id}/driver            register_driver
//! PUT    /{id}/attendance        upsert_attendance
//! GET    /{id}/attendance        get_employee_attendance (?month)
//!
//! ATTENDANCE (mounted at /attendance):
//! GET    /day                    get_daily_attendance (?date)
//! POST   /holiday                mark_holiday
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::employees;
use crate::state::AppState;

/// Employee routes -- mounted at `/employees`.
pub fn employees_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(employees::create_employee).get(employees::list_employees),
        )
        .route(
            "/{id}",
            get(employees::get_employee)
                .patch(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/{id}/driver", post(employees::register_driver))
        .route(
            "/{id}/attendance",
            put(employees::upsert_attendance).get(employees::get_employee_attendance),
        )
}

/// School-wide attendance routes -- mounted at `/attendance`.
pub fn attendance_router() -> Router<AppState> {
    Router::new()
        .route("/day", get(employees::get_daily_attendance))
        .route("/holiday", post(employees::mark_holiday))
}
