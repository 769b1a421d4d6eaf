//! Backup run state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phase of a single backup run.
///
/// `Idle → Scanning → (NoFilesFound | Copying) → (Completed | Failed)`, with
/// `Cancelled` reachable from either active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackupState {
    #[default]
    Idle,
    Scanning,
    NoFilesFound,
    Copying,
    Completed,
    Failed,
    Cancelled,
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Invalid backup state transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: BackupState,
    pub to: BackupState,
}

impl BackupState {
    /// Check whether `next` may follow this state.
    pub fn can_transition_to(self, next: BackupState) -> bool {
        use BackupState::*;
        matches!(
            (self, next),
            (Idle, Scanning)
                | (Scanning, NoFilesFound | Copying | Cancelled)
                | (Copying, Completed | Failed | Cancelled)
        )
    }

    /// Move to `next`, or report why that is not allowed.
    pub fn transition(self, next: BackupState) -> Result<BackupState, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// No further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::NoFilesFound | Self::Completed | Self::Failed | Self::Cancelled
        )
    }

    /// A run is in progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Scanning | Self::Copying)
    }
}

impl std::fmt::Display for BackupState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Scanning => write!(f, "Scanning"),
            Self::NoFilesFound => write!(f, "No files found"),
            Self::Copying => write!(f, "Copying"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}
