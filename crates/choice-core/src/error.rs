//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] choice_storage::StorageError),

    #[error("Gate error: {0}")]
    Gate(#[from] choice_gate::GateError),

    #[error("Page error: {0}")]
    Page(#[from] choice_page::PageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Required element missing: #{0}")]
    MissingCollaborator(String),

    #[error("Invalid banner transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Consent manager not initialized")]
    NotInitialized,
}
