//! Backup configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{BackupError, DirectoryRole};
use crate::extension::ExtensionSet;

/// Configuration for one backup run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
pub struct BackupConfig {
    /// Directory tree to copy from.
    #[builder(setter(into, strip_option))]
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Directory to copy into. Created if missing.
    #[builder(setter(into, strip_option))]
    #[serde(default)]
    pub destination: Option<PathBuf>,

    /// Extensions to include.
    #[serde(default)]
    pub extensions: ExtensionSet,

    /// Follow symbolic links while scanning.
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files and directories (starting with .).
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Number of threads for scanning (0 = auto-detect).
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            extensions: ExtensionSet::new(),
            follow_symlinks: false,
            include_hidden: true,
            threads: 0,
        }
    }
}

impl BackupConfig {
    /// Create a new backup config builder.
    pub fn builder() -> BackupConfigBuilder {
        BackupConfigBuilder::default()
    }

    /// Create a config for the given directories and extensions.
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        extensions: ExtensionSet,
    ) -> Self {
        Self {
            source: Some(source.into()),
            destination: Some(destination.into()),
            extensions,
            follow_symlinks: false,
            include_hidden: true,
            threads: 0,
        }
    }

    /// Check that both directories and at least one extension were chosen.
    ///
    /// Returns the `(source, destination)` pair. Touches no files.
    pub fn validate(&self) -> Result<(&Path, &Path), BackupError> {
        let source = selected(self.source.as_deref()).ok_or(BackupError::DirectoryNotSelected {
            role: DirectoryRole::Source,
        })?;
        let destination =
            selected(self.destination.as_deref()).ok_or(BackupError::DirectoryNotSelected {
                role: DirectoryRole::Destination,
            })?;

        if self.extensions.is_empty() {
            return Err(BackupError::NoExtensionsSelected);
        }

        Ok((source, destination))
    }
}

fn selected(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
