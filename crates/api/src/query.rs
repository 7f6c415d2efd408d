//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication. Handlers call
//! [`validator::Validate::validate`] on them before touching the database.

use serde::Deserialize;
use validator::Validate;

use crate::error::AppError;

/// One-based pagination (`?page=&limit=&ascending=`).
#[derive(Debug, Deserialize, Validate)]
pub struct PageParams {
    #[validate(range(min = 1))]
    pub page: i64,
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    #[serde(default)]
    pub ascending: bool,
}

impl PageParams {
    /// Row offset for the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Query flag for guarded deletes (`?force=true`).
#[derive(Debug, Deserialize)]
pub struct ForceParams {
    #[serde(default)]
    pub force: bool,
}

/// Run validator-derive checks, mapping failures to a 400 response.
pub fn validated<T: Validate>(params: T) -> Result<T, AppError> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(params)
}
