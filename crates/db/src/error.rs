use grua_core::error::CoreError;

/// Error returned by repository operations that enforce lifecycle rules
/// inside a transaction: either a domain refusal or a storage failure.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LifecycleError {
    /// Borrow the domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            LifecycleError::Core(err) => Some(err),
            LifecycleError::Database(_) => None,
        }
    }
}
