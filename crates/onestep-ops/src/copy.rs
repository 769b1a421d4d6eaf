//! Fail-fast copy of a file list into one destination directory.

use std::fs;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use onestep_core::BackupError;

use crate::conflict::unique_destination;
use crate::progress::CopyProgress;

/// Options for copy operations.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Carry the source modification time over to the copy.
    pub preserve_timestamps: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            preserve_timestamps: true,
        }
    }
}

/// Result for one attempted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Copied {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    Failed {
        source: PathBuf,
        reason: String,
    },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            Self::Copied { source, .. } | Self::Failed { source, .. } => source,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, Self::Copied { .. })
    }
}

/// Per-file results of one copy run.
///
/// Holds only attempted files: a failure is always the last entry, and a
/// cancelled run stops short of `total`.
#[derive(Debug, Clone, Default)]
pub struct CopyOutcome {
    /// Outcomes in the order files were attempted.
    pub files: Vec<FileOutcome>,
    /// Number of files the run was asked to copy.
    pub total: usize,
    /// The run stopped because cancellation was requested.
    pub cancelled: bool,
}

impl CopyOutcome {
    /// Every requested file was copied.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.files.len() == self.total && self.files.iter().all(FileOutcome::is_copied)
    }

    /// Number of files copied.
    pub fn copied(&self) -> usize {
        self.files.iter().filter(|f| f.is_copied()).count()
    }

    /// Total bytes written.
    pub fn bytes_copied(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match f {
                FileOutcome::Copied { bytes, .. } => *bytes,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// The failure that aborted the run, if any.
    pub fn failure(&self) -> Option<&FileOutcome> {
        self.files.iter().find(|f| !f.is_copied())
    }

    /// Collapse into the error that ended the run, if any.
    pub fn into_result(self) -> Result<Self, BackupError> {
        if let Some(FileOutcome::Failed { source, reason }) = self.failure() {
            return Err(BackupError::copy_failed(source.clone(), reason.clone()));
        }
        if self.cancelled {
            return Err(BackupError::Cancelled);
        }
        Ok(self)
    }
}

/// Copy `files` into `destination`, in order, stopping at the first failure.
///
/// The destination (with any missing parents) is created first. Each file
/// keeps its base name unless that name is taken, in which case a `_N`
/// suffix is added. `on_progress` runs after every successful copy, on the
/// calling thread. `cancel` is polled between files.
pub fn copy_files(
    files: &[PathBuf],
    destination: &Path,
    options: &CopyOptions,
    cancel: &CancellationToken,
    mut on_progress: impl FnMut(&CopyProgress),
) -> Result<CopyOutcome, BackupError> {
    let mut outcome = CopyOutcome {
        files: Vec::with_capacity(files.len()),
        total: files.len(),
        cancelled: false,
    };

    if files.is_empty() {
        return Ok(outcome);
    }

    if !destination.exists() {
        fs::create_dir_all(destination).map_err(|source| BackupError::DestinationCreateFailed {
            path: destination.to_path_buf(),
            source,
        })?;
        info!(destination = %destination.display(), "created destination");
    }

    let mut bytes_copied = 0u64;

    for source in files {
        if cancel.is_cancelled() {
            info!(copied = outcome.files.len(), total = files.len(), "copy cancelled");
            outcome.cancelled = true;
            break;
        }

        let Some(file_name) = source.file_name() else {
            outcome.files.push(FileOutcome::Failed {
                source: source.clone(),
                reason: "path has no file name".to_string(),
            });
            break;
        };
        let dest_path = unique_destination(destination, file_name);

        match copy_file(source, &dest_path, options) {
            Ok(bytes) => {
                debug!(source = %source.display(), destination = %dest_path.display(), bytes, "copied");
                bytes_copied += bytes;
                outcome.files.push(FileOutcome::Copied {
                    source: source.clone(),
                    destination: dest_path.clone(),
                    bytes,
                });
                on_progress(&CopyProgress {
                    files_completed: outcome.files.len(),
                    files_total: files.len(),
                    bytes_copied,
                    source: source.clone(),
                    destination: dest_path,
                });
            }
            Err(reason) => {
                warn!(source = %source.display(), %reason, "copy failed, aborting");
                outcome.files.push(FileOutcome::Failed {
                    source: source.clone(),
                    reason,
                });
                break;
            }
        }
    }

    Ok(outcome)
}

/// Copy a single file's content and permissions.
///
/// A failed copy removes whatever part of `dest` was written.
fn copy_file(source: &Path, dest: &Path, options: &CopyOptions) -> Result<u64, String> {
    let bytes = match fs::copy(source, dest) {
        Ok(bytes) => bytes,
        Err(e) => {
            remove_partial(dest);
            return Err(format!("Failed to copy: {}", e));
        }
    };

    if options.preserve_timestamps {
        // Timestamps are best effort; the content is already in place.
        if let Err(e) = preserve_mtime(source, dest) {
            debug!(destination = %dest.display(), error = %e, "could not preserve modification time");
        }
    }

    Ok(bytes)
}

fn remove_partial(dest: &Path) {
    match fs::remove_file(dest) {
        Ok(()) => debug!(destination = %dest.display(), "removed partial copy"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(destination = %dest.display(), error = %e, "could not remove partial copy"),
    }
}

fn preserve_mtime(source: &Path, dest: &Path) -> std::io::Result<()> {
    let modified = fs::metadata(source)?.modified()?;
    fs::File::options().write(true).open(dest)?.set_modified(modified)
}
