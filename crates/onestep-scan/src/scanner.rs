//! JWalk-based extension scanner.

use std::path::{Path, PathBuf};
use std::time::Duration;

use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use onestep_core::{BackupConfig, BackupError, ExtensionSet, ScanWarning, WarningKind};

use crate::progress::{ProgressTracker, ScanProgress};

/// Publish a progress snapshot every this many files.
const PROGRESS_INTERVAL: u64 = 256;

/// Walker settings.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Number of threads (0 = auto-detect).
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            threads: 0,
        }
    }
}

impl From<&BackupConfig> for ScanOptions {
    fn from(config: &BackupConfig) -> Self {
        Self {
            follow_symlinks: config.follow_symlinks,
            include_hidden: config.include_hidden,
            threads: config.threads,
        }
    }
}

/// Files found by one scan, in walk order.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Absolute paths of matching regular files.
    pub files: Vec<PathBuf>,
    /// Entries that could not be read and were skipped.
    pub warnings: Vec<ScanWarning>,
    /// Regular files visited, matching or not.
    pub files_seen: u64,
    /// Time taken by the walk.
    pub duration: Duration,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Scanner that collects files by extension using jwalk.
pub struct ExtensionScanner {
    options: ScanOptions,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl ExtensionScanner {
    /// Create a scanner with default options.
    pub fn new() -> Self {
        Self::with_options(ScanOptions::default())
    }

    /// Create a scanner with the given options.
    pub fn with_options(options: ScanOptions) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            options,
            progress_tx,
        }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Recursively collect files under `root` whose extension is accepted.
    ///
    /// `root` is not checked for existence; an unreadable root shows up as a
    /// warning and an empty result. An empty `accepted` set returns
    /// immediately without touching the filesystem.
    pub fn scan(&self, root: &Path, accepted: &ExtensionSet) -> ScanResult {
        self.walk(root, accepted, None).0
    }

    /// Like [`scan`](Self::scan), but stops with [`BackupError::Cancelled`]
    /// once `cancel` fires. The token is polled after every entry.
    pub fn scan_cancellable(
        &self,
        root: &Path,
        accepted: &ExtensionSet,
        cancel: &CancellationToken,
    ) -> Result<ScanResult, BackupError> {
        match self.walk(root, accepted, Some(cancel)) {
            (_, true) => Err(BackupError::Cancelled),
            (result, false) => Ok(result),
        }
    }

    fn walk(
        &self,
        root: &Path,
        accepted: &ExtensionSet,
        cancel: Option<&CancellationToken>,
    ) -> (ScanResult, bool) {
        if accepted.is_empty() {
            debug!("no accepted extensions, skipping scan");
            return (ScanResult::default(), false);
        }

        let root = absolute_root(root);
        info!(root = %root.display(), extensions = %accepted, "scanning");

        let parallelism = match self.options.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(&root)
            .parallelism(parallelism)
            .skip_hidden(!self.options.include_hidden)
            .follow_links(self.options.follow_symlinks)
            .sort(true);

        let mut tracker = ProgressTracker::new();
        let mut result = ScanResult::default();
        let mut cancelled = false;

        for entry_result in walker {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                info!(files_seen = tracker.files_seen(), "scan cancelled");
                cancelled = true;
                break;
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let kind = match err.io_error().map(|e| e.kind()) {
                        Some(std::io::ErrorKind::PermissionDenied) => WarningKind::PermissionDenied,
                        _ => WarningKind::ReadError,
                    };
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    tracker.record_error();
                    result.warnings.push(ScanWarning::new(path, err.to_string(), kind));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let matched = accepted.matches(&path);
            tracker.record_file(&path, matched);
            if matched {
                debug!(path = %path.display(), "matched");
                result.files.push(path);
            }

            if tracker.files_seen() % PROGRESS_INTERVAL == 0 {
                let _ = self.progress_tx.send(tracker.snapshot());
            }
        }

        let _ = self.progress_tx.send(tracker.snapshot());

        result.files_seen = tracker.files_seen();
        result.duration = tracker.elapsed();
        info!(
            matched = result.files.len(),
            seen = result.files_seen,
            warnings = result.warnings.len(),
            elapsed_ms = result.duration.as_millis() as u64,
            "scan finished"
        );

        (result, cancelled)
    }
}

impl Default for ExtensionScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Make the walk root absolute so every yielded path is absolute.
fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
