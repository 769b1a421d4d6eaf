//! Error types for selection updates.

use onestep_core::Extension;
use thiserror::Error;

use crate::node::CategoryId;

/// Errors returned when a selection update names something that does not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// No category with this id.
    #[error("Unknown category: {id}")]
    UnknownCategory { id: CategoryId },

    /// The category has no such extension.
    #[error("Category '{category}' has no extension {extension}")]
    UnknownExtension {
        category: String,
        extension: Extension,
    },

    /// The category has fewer extensions than the index.
    #[error("Category '{category}' has no extension at position {index}")]
    ExtensionIndexOutOfRange { category: String, index: usize },

    /// Extensions are two-state; partial only exists on categories.
    #[error("Extension {extension} cannot be set to partial")]
    PartialLeaf { extension: Extension },
}
