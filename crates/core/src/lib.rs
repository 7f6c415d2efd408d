//! Pure domain logic for the campus backend.
//!
//! Month arithmetic for session intervals, the enrollment overlap rule,
//! lifecycle guards, and the payment allocation walk. This crate performs
//! no I/O; the `campus-db` repositories run these routines inside database
//! transactions.

pub mod allocation;
pub mod calendar;
pub mod enrollment;
pub mod error;
pub mod types;
