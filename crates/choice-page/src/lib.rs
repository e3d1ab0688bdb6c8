//! Cookie Choice Page Model
//!
//! A small mutable document the consent core operates on. Markup is imported
//! through `scraper`; afterwards every element is addressed by a stable
//! [`ElementId`] that survives any number of rescans and mutations.

mod error;
mod page;
mod style;

pub use error::PageError;
pub use page::{ElementId, Page};

pub type Result<T> = std::result::Result<T, PageError>;
