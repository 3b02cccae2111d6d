use crate::checklist::Violation;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Finalization was refused; carries every outstanding violation.
    #[error("Checklist has {} outstanding violation(s)", .0.len())]
    Violations(Vec<Violation>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already finalized: {0}")]
    AlreadyFinalized(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
