use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl RepositoryError {
    /// Maps a unique-index violation to `AlreadyExists`, everything else to `Sqlx`.
    pub fn from_unique(err: SqlxError, message: impl Into<String>) -> Self {
        if let SqlxError::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepositoryError::AlreadyExists(message.into());
        }
        RepositoryError::Sqlx(err)
    }
}
