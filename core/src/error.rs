use thiserror::Error;

/// Errors surfaced by the search-facing half of the core: normalization,
/// ranking, hydration and coordination.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query was empty after normalization")]
    EmptyQuery,

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("search was cancelled")]
    Cancelled,
}

/// Errors surfaced by the entry store, the only component that talks to
/// Postgres directly.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Transient failures (connection resets, serialization failures) get a
    /// single automatic retry; anything else is surfaced immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Database(sqlx::Error::Io(_)) => true,
            StoreError::Database(sqlx::Error::PoolTimedOut) => true,
            StoreError::Database(sqlx::Error::Database(db)) => {
                // Postgres class 40 = transaction rollback (serialization
                // failures, deadlocks); class 08 = connection exceptions.
                matches!(db.code().as_deref(), Some(code) if code.starts_with("40") || code.starts_with("08"))
            }
            _ => false,
        }
    }
}
