//! Page error types

use thiserror::Error;

use crate::page::ElementId;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Element {0} is not attached to a parent")]
    Detached(ElementId),

    #[error("Cannot insert {child} under its own descendant {parent}")]
    Hierarchy { parent: ElementId, child: ElementId },
}
