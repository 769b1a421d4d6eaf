//! Copy engine and backup pipeline for onestep.
//!
//! This crate copies scanned files into a destination directory with
//! collision-safe names, aborting on the first failure, and drives the whole
//! validate → scan → copy run on a worker thread with progress delivered over
//! a channel.

mod backup;
mod conflict;
mod copy;
mod progress;
mod state;

pub use backup::{run_backup, start_backup, BackupEvent, BackupHandle, BackupOutcome};
pub use conflict::unique_destination;
pub use copy::{copy_files, CopyOptions, CopyOutcome, FileOutcome};
pub use progress::{percent_complete, CopyProgress};
pub use state::{BackupState, InvalidTransition};

/// Default channel buffer size for backup events.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
