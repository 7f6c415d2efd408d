//! Route definitions for students, enrollments, and fee operations.
//!
//! ```text
//! STUDENTS:
//! POST   /                                  create_student
//! GET    /search                            search_students (?q&page&limit&ascending)
//! GET    /{id}                              get_student
//! PATCH  /{id}                              update_student
//! DELETE /{id}                              delete_student (?force)
//! GET    /{id}/payments                     get_student_payments (?page&limit)
//!
//! ENROLLMENTS (nested under /{student_id}/enrollments):
//! POST   /                                  create_enrollment
//! GET    /{enrollment_id}                   get_enrollment_details
//! PATCH  /{enrollment_id}                   update_enrollment
//! DELETE /{enrollment_id}                   delete_enrollment (?force)
//! GET    /{enrollment_id}/fees              list_fees
//! POST   /{enrollment_id}/fees/generate     generate_fees
//! POST   /{enrollment_id}/fees/reset        reset_fees
//! POST   /{enrollment_id}/payments          pay_fee
//! POST   /{enrollment_id}/exams             create_exam_entry
//! PATCH  /{enrollment_id}/exams/{entry_id}  update_exam_entry
//! DELETE /{enrollment_id}/exams/{entry_id}  delete_exam_entry
//! ```

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{enrollments, fees, students};
use crate::state::AppState;

/// Student routes -- mounted at `/students`.
pub fn students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(students::create_student))
        .route("/search", get(students::search_students))
        .route(
            "/{id}",
            get(students::get_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .route("/{id}/payments", get(students::get_student_payments))
        .nest("/{student_id}/enrollments", enrollments_router())
}

/// Enrollment routes -- nested under `/students/{student_id}/enrollments`.
fn enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(enrollments::create_enrollment))
        .route(
            "/{enrollment_id}",
            get(enrollments::get_enrollment_details)
                .patch(enrollments::update_enrollment)
                .delete(enrollments::delete_enrollment),
        )
        .route("/{enrollment_id}/fees", get(fees::list_fees))
        .route("/{enrollment_id}/fees/generate", post(fees::generate_fees))
        .route("/{enrollment_id}/fees/reset", post(fees::reset_fees))
        .route("/{enrollment_id}/payments", post(fees::pay_fee))
        .route("/{enrollment_id}/exams", post(enrollments::create_exam_entry))
        .route(
            "/{enrollment_id}/exams/{entry_id}",
            patch(enrollments::update_exam_entry).delete(enrollments::delete_exam_entry),
        )
}
