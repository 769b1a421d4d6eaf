//! Error types for backup operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two backup directories an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryRole {
    Source,
    Destination,
}

impl std::fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Errors that can end a backup run.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Source or destination directory was not chosen.
    #[error("Please select both source and destination directories ({role} is missing)")]
    DirectoryNotSelected { role: DirectoryRole },

    /// The accepted extension set is empty.
    #[error("Please select at least one file type")]
    NoExtensionsSelected,

    /// The scan found nothing to copy. Informational, not a failure.
    #[error("No matching files found in {}", root.display())]
    NoMatchingFiles { root: PathBuf },

    /// The destination directory could not be created.
    #[error("Failed to create destination {}: {source}", path.display())]
    DestinationCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a single file failed; the run was aborted.
    #[error("Failed to copy file: {}: {reason}", path.display())]
    CopyFailed { path: PathBuf, reason: String },

    /// The run was cancelled by the user.
    #[error("Backup cancelled")]
    Cancelled,
}

impl BackupError {
    /// Create a copy failure for a path.
    pub fn copy_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CopyFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors detected before any filesystem work starts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotSelected { .. } | Self::NoExtensionsSelected
        )
    }

    /// Terminal states that are reported to the user but are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NoMatchingFiles { .. })
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory entry.
    ReadError,
}

/// Non-fatal problem encountered while scanning; the entry is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning from an I/O error, classifying permission problems.
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self::new(path, error.to_string(), kind)
    }
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}
