//! Application state types.

use std::collections::VecDeque;
use std::path::PathBuf;

use onestep_ops::{BackupOutcome, BackupState};
use onestep_scan::ScanProgress;

use super::constants::MAX_LOG_LINES;

/// Application mode representing the current UI state.
///
/// A running backup is not a mode: it proceeds in the background while the
/// main window stays in `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Help,
    /// Typing the source directory.
    EditingSource,
    /// Typing the destination directory.
    EditingDestination,
    /// The file type dialog is open.
    SelectingTypes,
    Quit,
}

impl AppMode {
    pub fn is_editing(self) -> bool {
        matches!(self, Self::EditingSource | Self::EditingDestination)
    }
}

/// Severity of a status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A blocking status message; the next key press dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }

    /// Notice for a finished backup.
    pub fn for_outcome(outcome: &BackupOutcome) -> Self {
        let text = outcome.summary();
        match outcome {
            BackupOutcome::Completed { .. } => Self::success(text),
            BackupOutcome::NoFilesFound { .. } => Self::info(text),
            BackupOutcome::Failed(_) => Self::error(text),
            BackupOutcome::Cancelled { .. } => Self::warning(text),
        }
    }
}

/// Scrolling message list shown in the main window.
///
/// Holds the preview listing and backup progress lines. Oldest lines drop
/// off once the list is full.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    lines: VecDeque<String>,
    /// Lines scrolled up from the bottom; 0 follows new output.
    scroll: usize,
}

impl MessageLog {
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == MAX_LOG_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll = 0;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.scroll = (self.scroll + by).min(self.lines.len().saturating_sub(1));
    }

    pub fn scroll_down(&mut self, by: usize) {
        self.scroll = self.scroll.saturating_sub(by);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = self.lines.len().saturating_sub(1);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }

    /// The `height` lines visible at the current scroll position.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = &str> {
        let end = self.lines.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(height);
        self.lines.range(start..end).map(String::as_str)
    }
}

/// Progress of the backup currently shown in the gauge.
#[derive(Debug, Clone, Default)]
pub struct BackupView {
    pub state: BackupState,
    pub percent: u8,
    /// Latest progress message.
    pub message: Option<String>,
}

/// Messages from a background preview scan.
#[derive(Debug)]
pub enum PreviewMessage {
    Progress(ScanProgress),
    Complete(PreviewResult),
    /// The worker died before finishing.
    Failed(String),
}

/// Files a preview scan found.
#[derive(Debug)]
pub struct PreviewResult {
    /// Directory that was scanned.
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    /// Entries that could not be read.
    pub warnings: usize,
}
