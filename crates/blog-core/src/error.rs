//! Storage-level error types.

use thiserror::Error;

/// Repository-level errors.
///
/// Anything other than [`RepoError::NotFound`] is a store failure and is
/// surfaced to the caller unchanged as a fatal request failure.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
