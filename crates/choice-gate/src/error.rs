//! Gating error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Storage error: {0}")]
    Storage(#[from] choice_storage::StorageError),

    #[error("Page error: {0}")]
    Page(#[from] choice_page::PageError),

    #[error("Failed to load script {locator}: {reason}")]
    ResourceLoad { locator: String, reason: String },

    #[error("Inline script {element} failed: {reason}")]
    InlineExecution { element: String, reason: String },

    #[error("Unknown consent category: {0}")]
    UnknownCategory(String),
}
