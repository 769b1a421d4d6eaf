//! Core types for onestep.
//!
//! This crate provides the data structures shared by the selection model,
//! the scanner and the copy engine: normalized file extensions, the built-in
//! category table, tri-state selection values, backup configuration and the
//! error type every backup stage reports through.

mod category;
mod config;
mod error;
mod extension;
mod state;

pub use category::{Category, CategoryTable};
pub use config::{BackupConfig, BackupConfigBuilder};
pub use error::{BackupError, DirectoryRole, ScanWarning, WarningKind};
pub use extension::{Extension, ExtensionSet, EXTENSION_SEPARATOR};
pub use state::SelectionState;
