//! The error type shared by the storage, repository and view-state layers.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An unexpected error from the underlying SQLite library.
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// A stored row carries a transaction type other than `CREDIT` or `DEBIT`.
    #[error("unknown transaction type \"{0}\"")]
    InvalidTransactionType(String),

    /// A stored creation timestamp could not be parsed.
    ///
    /// Holds the raw value and the parser message.
    #[error("invalid timestamp \"{0}\": {1}")]
    InvalidTimestamp(String, String),

    /// No transaction exists with the given ID.
    #[error("transaction {0} not found")]
    NotFound(i64),

    /// A blocking call dispatched to the background pool panicked or was cancelled.
    #[error("background task failed: {0}")]
    Background(String),

    /// Another thread panicked while holding the database connection.
    #[error("the database connection lock was poisoned")]
    LockPoisoned,

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
