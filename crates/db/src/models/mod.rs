//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod attendance;
pub mod class_section;
pub mod classroom;
pub mod dashboard;
pub mod employee;
pub mod enrollment;
pub mod exam_entry;
pub mod fee_payment;
pub mod monthly_fee;
pub mod student;
pub mod vehicle;
