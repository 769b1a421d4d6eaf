//! The full backup run: validate, scan, copy.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use onestep_core::{BackupConfig, BackupError};
use onestep_scan::{ExtensionScanner, ScanOptions};

use crate::copy::{copy_files, CopyOptions};
use crate::state::BackupState;
use crate::OPERATION_CHANNEL_SIZE;

/// Event emitted while a backup runs.
#[derive(Debug)]
pub enum BackupEvent {
    /// The run entered a new phase.
    StateChanged(BackupState),
    /// Progress line for the user.
    Progress { percent: u8, message: String },
    /// The run finished. Always the last event from [`start_backup`].
    Complete(BackupOutcome),
}

/// How a backup run ended.
#[derive(Debug)]
pub enum BackupOutcome {
    /// Every matching file was copied.
    Completed { copied: usize, bytes: u64 },
    /// The source held no matching files; nothing was copied.
    NoFilesFound { root: PathBuf },
    /// The run stopped at an error. Files before it were copied.
    Failed(BackupError),
    /// The user cancelled the run.
    Cancelled { copied: usize, total: usize },
}

impl BackupOutcome {
    /// Terminal state this outcome corresponds to.
    pub fn state(&self) -> BackupState {
        match self {
            Self::Completed { .. } => BackupState::Completed,
            Self::NoFilesFound { .. } => BackupState::NoFilesFound,
            Self::Failed(_) => BackupState::Failed,
            Self::Cancelled { .. } => BackupState::Cancelled,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Human-readable summary for a status line or dialog.
    pub fn summary(&self) -> String {
        match self {
            Self::Completed { copied, .. } => {
                format!("Backup completed successfully! {} files copied", copied)
            }
            Self::NoFilesFound { .. } => {
                "No matching files found in the source directory.".to_string()
            }
            Self::Failed(err) => err.to_string(),
            Self::Cancelled { copied, total } => {
                format!("Backup cancelled after {} of {} files", copied, total)
            }
        }
    }
}

/// Handle to a backup running on a worker thread.
pub struct BackupHandle {
    events: mpsc::Receiver<BackupEvent>,
    cancel: CancellationToken,
}

impl BackupHandle {
    /// Receive the next event; `None` once the worker has finished.
    pub async fn recv(&mut self) -> Option<BackupEvent> {
        self.events.recv().await
    }

    /// Ask the worker to stop after the file it is on.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Start a backup on a blocking worker thread.
///
/// Validation happens here, before any filesystem work, so a missing
/// directory or empty extension set is returned immediately. Must be called
/// from within a Tokio runtime. Dropping the handle cancels the run.
pub fn start_backup(config: BackupConfig) -> Result<BackupHandle, BackupError> {
    config.validate()?;

    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    tokio::task::spawn_blocking(move || {
        let closed = worker_cancel.clone();
        let event_tx = tx.clone();
        let outcome = run_backup(&config, &worker_cancel, |event| {
            if event_tx.blocking_send(event).is_err() {
                // Nobody is listening any more.
                closed.cancel();
            }
        })
        .unwrap_or_else(BackupOutcome::Failed);
        let _ = tx.blocking_send(BackupEvent::Complete(outcome));
    });

    Ok(BackupHandle { events: rx, cancel })
}

/// Run a whole backup on the current thread.
///
/// Returns `Err` only for validation failures, which are reported before any
/// state change. Everything after that ends in a [`BackupOutcome`]; `emit`
/// sees every state change and progress line in order, interleaved with the
/// copy loop.
pub fn run_backup(
    config: &BackupConfig,
    cancel: &CancellationToken,
    emit: impl FnMut(BackupEvent),
) -> Result<BackupOutcome, BackupError> {
    let (source, destination) = config.validate()?;
    let mut run = Run::new(emit);

    let result = execute(config, source, destination, cancel, &mut run);
    let outcome = match result {
        Ok(bytes) => BackupOutcome::Completed {
            copied: run.copied,
            bytes,
        },
        Err(BackupError::NoMatchingFiles { root }) => BackupOutcome::NoFilesFound { root },
        Err(BackupError::Cancelled) => BackupOutcome::Cancelled {
            copied: run.copied,
            total: run.total,
        },
        Err(err) => BackupOutcome::Failed(err),
    };

    run.advance(outcome.state());
    match &outcome {
        BackupOutcome::Failed(err) => error!(error = %err, copied = run.copied, "backup failed"),
        other => info!(outcome = %other.summary(), "backup finished"),
    }
    Ok(outcome)
}

fn execute<F: FnMut(BackupEvent)>(
    config: &BackupConfig,
    source: &Path,
    destination: &Path,
    cancel: &CancellationToken,
    run: &mut Run<F>,
) -> Result<u64, BackupError> {
    run.advance(BackupState::Scanning);
    run.progress(0, "Searching for matching files...".to_string());

    let scanner = ExtensionScanner::with_options(ScanOptions::from(config));
    let scan = scanner.scan_cancellable(source, &config.extensions, cancel)?;
    if !scan.warnings.is_empty() {
        warn!(warnings = scan.warnings.len(), "some entries could not be read");
        run.progress(0, unreadable_message(scan.warnings.len()));
    }
    if scan.is_empty() {
        return Err(BackupError::NoMatchingFiles {
            root: source.to_path_buf(),
        });
    }

    run.total = scan.len();
    run.advance(BackupState::Copying);
    run.progress(
        0,
        format!("Found {} matching files. Starting backup...", scan.len()),
    );

    let outcome = copy_files(
        &scan.files,
        destination,
        &CopyOptions::default(),
        cancel,
        |progress| {
            run.copied = progress.files_completed;
            run.progress(progress.percentage(), progress.message());
        },
    )?;

    let bytes = outcome.bytes_copied();
    outcome.into_result()?;
    Ok(bytes)
}

fn unreadable_message(count: usize) -> String {
    match count {
        1 => "Skipped 1 entry that could not be read".to_string(),
        n => format!("Skipped {} entries that could not be read", n),
    }
}

/// Bookkeeping for one run: current state plus counts for the outcome.
struct Run<F> {
    emit: F,
    state: BackupState,
    copied: usize,
    total: usize,
}

impl<F: FnMut(BackupEvent)> Run<F> {
    fn new(emit: F) -> Self {
        Self {
            emit,
            state: BackupState::Idle,
            copied: 0,
            total: 0,
        }
    }

    fn advance(&mut self, next: BackupState) {
        match self.state.transition(next) {
            Ok(state) => {
                info!(from = %self.state, to = %state, "backup state");
                self.state = state;
                (self.emit)(BackupEvent::StateChanged(state));
            }
            Err(err) => error!(%err, "ignoring state change"),
        }
    }

    fn progress(&mut self, percent: u8, message: String) {
        (self.emit)(BackupEvent::Progress { percent, message });
    }
}
