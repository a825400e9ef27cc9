//! Store Errors

/// Errors that can occur in the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique email constraint violated
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StoreError::DuplicateEmail(_))
    }
}
