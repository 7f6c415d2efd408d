//! Route definitions for classrooms and their sections.
//!
//! ```text
//! POST   /                                     create_classroom
//! GET    /                                     list_classrooms
//! GET    /{id}                                 get_classroom
//! PATCH  /{id}                                 update_classroom
//! DELETE /{id}                                 delete_classroom (?force)
//!
//! SECTIONS (nested under /{classroom_id}/sections):
//! POST   /                                     create_section
//! GET    /                                     list_sections
//! PATCH  /{section_id}                         update_section
//! DELETE /{section_id}                         delete_section (?force)
//! GET    /{section_id}/roster                  section_roster
//! ```

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{classrooms, sections};
use crate::state::AppState;

/// Classroom routes -- mounted at `/classrooms`.
pub fn classrooms_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(classrooms::create_classroom).get(classrooms::list_classrooms),
        )
        .route(
            "/{id}",
            get(classrooms::get_classroom)
                .patch(classrooms::update_classroom)
                .delete(classrooms::delete_classroom),
        )
        .nest("/{classroom_id}/sections", sections_router())
}

/// Section routes -- nested under `/classrooms/{classroom_id}/sections`.
fn sections_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(sections::create_section).get(sections::list_sections),
        )
        .route(
            "/{section_id}",
            patch(sections::update_section).delete(sections::delete_section),
        )
        .route("/{section_id}/roster", get(sections::section_roster))
}
