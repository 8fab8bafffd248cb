/**
 * Responsibility
 * - the meaning a store passes up to services
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict on {0}")]
    Conflict(&'static str),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Maps a unique violation (SQLSTATE 23505) to `Conflict(field)`.
    pub fn from_sqlx(e: sqlx::Error, field: &'static str) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return StoreError::Conflict(field);
        }
        StoreError::Db(e)
    }
}
