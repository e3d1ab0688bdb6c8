//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed expiry descriptor: {0}")]
    MalformedExpiry(String),

    #[error("Expiry out of range: {0}")]
    ExpiryOutOfRange(String),

    #[error("Invalid cookie name: {0:?}")]
    InvalidName(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
}
