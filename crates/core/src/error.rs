use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("State conflict: {0}")]
    StateConflict(String),

    #[error("Enrollment overlap: {0}")]
    OverlapConflict(String),

    #[error("Overpayment: paid amount {paid} exceeds the total outstanding balance {outstanding}")]
    Overpayment { paid: f64, outstanding: f64 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
