//! Cookie Choice Storage Layer
//!
//! Expiring key/value persistence for consent entries.
//! Two backends share the [`CookieJar`] contract: a SQLite database for
//! durable storage and an in-memory jar for embedding and tests.

mod database;
mod error;
mod expiry;
mod jar;
mod migrations;
mod value;

pub use database::Database;
pub use error::StorageError;
pub use expiry::{Expiry, ExpiryUnit};
pub use jar::{Cookie, CookieJar, MemoryJar};
pub use value::{parse_cookie_string, CookieValue};

pub type Result<T> = std::result::Result<T, StorageError>;
