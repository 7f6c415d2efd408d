//! Classroom models and DTOs.

use campus_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A classroom row from the `classrooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Classroom {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
}

/// Input for creating a classroom.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassroom {
    pub name: String,
    pub is_active: Option<bool>,
}

/// Patch for an existing classroom.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClassroom {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}
