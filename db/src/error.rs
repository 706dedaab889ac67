use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors raised by model operations that callers are expected to branch on.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The `users.email` unique constraint rejected the insert.
    #[error("a user with this email address already exists")]
    DuplicateEmail,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ModelError {
    /// Maps a failed `users` insert, lifting email uniqueness violations into
    /// [`ModelError::DuplicateEmail`].
    ///
    /// Postgres reports the constraint name (`users_email_key`) and SQLite the
    /// column (`users.email`), so both contain `email`.
    pub fn from_user_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("email") => {
                ModelError::DuplicateEmail
            }
            _ => ModelError::Db(err),
        }
    }
}
