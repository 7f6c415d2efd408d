//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers validate request parameters, delegate to the corresponding
//! repository in `campus_db`, and map errors via [`crate::error::AppError`].

pub mod classrooms;
pub mod dashboard;
pub mod employees;
pub mod enrollments;
pub mod fees;
pub mod sections;
pub mod students;
pub mod vehicles;
