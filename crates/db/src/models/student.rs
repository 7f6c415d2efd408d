//! Student models and DTOs.

use campus_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A student row from the `students` table.
///
/// `identity_documents` is a JSON array of `{ doc_name, doc_value }` pairs
/// (government ids, birth certificate numbers) searched by the directory.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub name: String,
    pub search_name: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub father_name: String,
    pub mother_name: String,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
    pub is_active: bool,
    pub identity_documents: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for registering a new student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub name: String,
    pub search_name: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub father_name: String,
    pub mother_name: String,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
    pub identity_documents: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Patch for an existing student; absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudent {
    pub name: Option<String>,
    pub search_name: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
    pub is_active: Option<bool>,
    pub identity_documents: Option<serde_json::Value>,
}
