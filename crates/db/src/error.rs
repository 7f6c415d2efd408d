//! Error type for transactional repository operations.
//!
//! Simple lookups return `Result<_, sqlx::Error>` directly; operations that
//! enforce domain guards inside a transaction return [`RepoError`] so the
//! caller can tell a rejected precondition from a storage failure.

use campus_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain invariant rejected the operation; the transaction was
    /// rolled back before any mutation became visible.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// The storage engine failed; the transaction was rolled back.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
