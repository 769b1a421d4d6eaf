//! Application state and main loop.

mod constants;
pub mod input;
mod render;
mod scanning;
pub mod state;

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use onestep_core::{BackupConfig, CategoryTable, DirectoryRole, ExtensionSet};
use onestep_ops::{BackupEvent, BackupHandle, BackupOutcome, BackupState};
use onestep_scan::{ScanOptions, ScanProgress};

use crate::event::KeyAction;
use crate::theme::Theme;
use crate::ui::{format_size, SelectionDialog};

use self::constants::{PAGE_SIZE, TICK_INTERVAL_MS};
use self::input::{prefill, InputResult, InputState};
use self::state::{AppMode, BackupView, MessageLog, Notice, PreviewMessage, PreviewResult};

/// Result type for the application.
pub type AppResult<T> = color_eyre::Result<T>;

const BUSY_MESSAGE: &str = "A backup is running. Press Esc to cancel it first.";

/// Something a background worker delivered to the main loop.
#[derive(Debug)]
enum WorkerMessage {
    /// `None` means the backup worker went away.
    Backup(Option<BackupEvent>),
    /// `None` means the preview worker went away.
    Preview(Option<PreviewMessage>),
}

/// Main application state.
///
/// Owns the accepted extension set for as long as the window lives; the
/// type dialog edits a copy and replaces it on accept.
pub struct App {
    mode: AppMode,
    theme: Theme,
    table: CategoryTable,
    /// Directories, extensions and scan options for the next backup.
    config: BackupConfig,

    input: Option<InputState>,
    dialog: Option<SelectionDialog>,
    notice: Option<Notice>,
    log: MessageLog,

    backup: Option<BackupHandle>,
    backup_view: BackupView,

    preview_rx: Option<mpsc::Receiver<PreviewMessage>>,
    preview_cancel: Option<CancellationToken>,
    preview_progress: Option<ScanProgress>,

    needs_redraw: bool,
}

impl App {
    /// Create the app for an initial configuration.
    pub fn new(config: BackupConfig, table: CategoryTable) -> Self {
        Self {
            mode: AppMode::Normal,
            theme: Theme::default(),
            table,
            config,
            input: None,
            dialog: None,
            notice: None,
            log: MessageLog::default(),
            backup: None,
            backup_view: BackupView::default(),
            preview_rx: None,
            preview_cancel: None,
            preview_progress: None,
            needs_redraw: true,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Extensions the next backup will copy.
    pub fn extensions(&self) -> &ExtensionSet {
        &self.config.extensions
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn dialog(&self) -> Option<&SelectionDialog> {
        self.dialog.as_ref()
    }

    pub fn input(&self) -> Option<&InputState> {
        self.input.as_ref()
    }

    pub fn backup_view(&self) -> &BackupView {
        &self.backup_view
    }

    /// A backup worker is running.
    pub fn is_busy(&self) -> bool {
        self.backup.is_some()
    }

    /// A preview scan is running.
    pub fn is_previewing(&self) -> bool {
        self.preview_rx.is_some()
    }

    /// Wait for the next message from a background worker and apply it.
    ///
    /// Never completes while no worker is running.
    pub async fn poll_workers(&mut self) {
        let message = next_worker_message(&mut self.backup, &mut self.preview_rx).await;
        self.handle_worker_message(message);
    }

    /// Run the application main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> AppResult<()> {
        if self.config.source.is_some() {
            self.start_preview();
        }

        let period = Duration::from_millis(TICK_INTERVAL_MS);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while self.mode != AppMode::Quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                biased;

                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key) = event {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key);
                        }
                    }
                    self.needs_redraw = true;
                }

                _ = self.poll_workers() => {
                    self.needs_redraw = true;
                }

                _ = interval.tick() => {}
            }
        }

        if self.is_busy() {
            self.cancel_backup();
            terminal.draw(|frame| self.render(frame))?;
        }
        self.shut_down().await;

        Ok(())
    }

    /// Stop every worker and wait for a running backup to finish its
    /// current file, so nothing is left half-written.
    pub async fn shut_down(&mut self) {
        self.cancel_preview();
        self.cancel_backup();
        while let Some(handle) = &mut self.backup {
            let event = handle.recv().await;
            self.handle_worker_message(WorkerMessage::Backup(event));
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        render::draw(self, frame);
    }

    /// Handle one key press in whatever mode is active.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let action = KeyAction::from_key_event(key);
        if action == KeyAction::ForceQuit {
            self.quit();
            return;
        }

        // A notice swallows the key that dismisses it
        if self.notice.take().is_some() {
            return;
        }

        match self.mode {
            AppMode::EditingSource | AppMode::EditingDestination => self.handle_input_key(key),
            AppMode::SelectingTypes => self.handle_dialog_action(action),
            AppMode::Help => self.mode = AppMode::Normal,
            AppMode::Normal => self.handle_action(action),
            AppMode::Quit => {}
        }
    }

    /// Handle a key action in the main window.
    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit | KeyAction::ForceQuit => self.quit(),

            KeyAction::EditSource => self.open_prompt(DirectoryRole::Source),
            KeyAction::EditDestination => self.open_prompt(DirectoryRole::Destination),
            KeyAction::SelectTypes => self.open_type_dialog(),
            KeyAction::Confirm | KeyAction::StartBackup => self.start_backup(),
            KeyAction::Preview => {
                if self.is_busy() {
                    self.notice = Some(Notice::warning(BUSY_MESSAGE));
                } else if self.config.source.is_none() {
                    self.notice = Some(Notice::warning("Select a source directory first"));
                } else {
                    self.start_preview();
                }
            }
            KeyAction::Cancel => self.cancel_backup(),

            KeyAction::MoveUp => self.log.scroll_up(1),
            KeyAction::MoveDown => self.log.scroll_down(1),
            KeyAction::PageUp => self.log.scroll_up(PAGE_SIZE),
            KeyAction::PageDown => self.log.scroll_down(PAGE_SIZE),
            KeyAction::JumpToTop => self.log.scroll_to_top(),
            KeyAction::JumpToBottom => self.log.scroll_to_bottom(),

            KeyAction::ToggleHelp => self.mode = AppMode::Help,
            KeyAction::ToggleTheme => self.theme = self.theme.toggle(),

            KeyAction::Toggle | KeyAction::None => {}
        }
    }

    fn quit(&mut self) {
        if let Some(handle) = &self.backup {
            handle.cancel();
        }
        self.mode = AppMode::Quit;
    }

    // ---- Directory prompts ----

    fn open_prompt(&mut self, role: DirectoryRole) {
        if self.is_busy() {
            self.notice = Some(Notice::warning(BUSY_MESSAGE));
            return;
        }
        let current = match role {
            DirectoryRole::Source => self.config.source.as_deref(),
            DirectoryRole::Destination => self.config.destination.as_deref(),
        };
        self.input = Some(InputState::with_initial(role, &prefill(current)));
        self.mode = match role {
            DirectoryRole::Source => AppMode::EditingSource,
            DirectoryRole::Destination => AppMode::EditingDestination,
        };
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let Some(input) = &mut self.input else {
            self.mode = AppMode::Normal;
            return;
        };

        match input.handle_key(key) {
            InputResult::Continue => {}
            InputResult::Cancel => self.close_prompt(),
            InputResult::Submit(_) => match input.resolve_directory() {
                Ok(path) => {
                    let role = input.role;
                    self.close_prompt();
                    self.set_directory(role, path);
                }
                Err(message) => input.set_error(message),
            },
        }
    }

    fn close_prompt(&mut self) {
        self.input = None;
        self.mode = AppMode::Normal;
    }

    /// Record a chosen directory. A new source triggers a preview scan.
    pub fn set_directory(&mut self, role: DirectoryRole, path: PathBuf) {
        info!(%role, path = %path.display(), "directory selected");
        match role {
            DirectoryRole::Source => {
                self.config.source = Some(path);
                self.start_preview();
            }
            DirectoryRole::Destination => {
                self.log.push(format!("Destination: {}", path.display()));
                self.config.destination = Some(path);
            }
        }
    }

    // ---- File type dialog ----

    fn open_type_dialog(&mut self) {
        if self.is_busy() {
            self.notice = Some(Notice::warning(BUSY_MESSAGE));
            return;
        }
        self.dialog = Some(SelectionDialog::new(&self.table, &self.config.extensions));
        self.mode = AppMode::SelectingTypes;
    }

    fn handle_dialog_action(&mut self, action: KeyAction) {
        let Some(dialog) = &mut self.dialog else {
            self.mode = AppMode::Normal;
            return;
        };

        match action {
            KeyAction::MoveUp => dialog.move_up(1),
            KeyAction::MoveDown => dialog.move_down(1),
            KeyAction::PageUp => dialog.move_up(PAGE_SIZE),
            KeyAction::PageDown => dialog.move_down(PAGE_SIZE),
            KeyAction::JumpToTop => dialog.jump_to_top(),
            KeyAction::JumpToBottom => dialog.jump_to_bottom(),
            KeyAction::Toggle => {
                if let Err(err) = dialog.toggle_current() {
                    warn!(%err, "toggle rejected");
                    self.notice = Some(Notice::error(err.to_string()));
                }
            }
            KeyAction::Confirm => self.accept_type_dialog(),
            KeyAction::Cancel | KeyAction::Quit => {
                debug!("type selection discarded");
                self.dialog = None;
                self.mode = AppMode::Normal;
            }
            _ => {}
        }
    }

    fn accept_type_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        self.mode = AppMode::Normal;

        let accepted = dialog.accept();
        if accepted == self.config.extensions {
            return;
        }
        info!(extensions = %accepted, "file types changed");
        self.config.extensions = accepted;

        // The listing depends on the types; refresh it
        if self.config.source.is_some() {
            self.start_preview();
        }
    }

    // ---- Preview scan ----

    fn start_preview(&mut self) {
        let Some(root) = self.config.source.clone() else {
            return;
        };
        self.cancel_preview();
        self.log.clear();
        self.log.push(format!("Source: {}", root.display()));

        let cancel = CancellationToken::new();
        self.preview_rx = Some(scanning::start_preview(
            root,
            self.config.extensions.clone(),
            ScanOptions::from(&self.config),
            cancel.clone(),
        ));
        self.preview_cancel = Some(cancel);
    }

    fn cancel_preview(&mut self) {
        if let Some(cancel) = self.preview_cancel.take() {
            cancel.cancel();
        }
        self.preview_rx = None;
        self.preview_progress = None;
    }

    fn handle_preview(&mut self, message: PreviewMessage) {
        match message {
            PreviewMessage::Progress(progress) => self.preview_progress = Some(progress),
            PreviewMessage::Complete(result) => {
                self.preview_rx = None;
                self.preview_cancel = None;
                self.preview_progress = None;
                self.show_preview(result);
            }
            PreviewMessage::Failed(reason) => {
                self.cancel_preview();
                self.notice = Some(Notice::error(format!("Preview scan failed: {reason}")));
            }
        }
    }

    /// List the preview result in the message area.
    pub fn show_preview(&mut self, result: PreviewResult) {
        if self.config.source.as_deref() != Some(result.root.as_path()) {
            debug!(root = %result.root.display(), "dropping stale preview");
            return;
        }

        if result.files.is_empty() {
            self.log.push("No matching files found in the selected directory.");
        } else {
            self.log.push(format!("Found {} matching files:", result.files.len()));
            for file in &result.files {
                self.log.push(file.display().to_string());
            }
        }
        if result.warnings > 0 {
            self.log
                .push(format!("{} entries could not be read", result.warnings));
        }
    }

    // ---- Backup ----

    fn start_backup(&mut self) {
        if self.is_busy() {
            self.notice = Some(Notice::warning(BUSY_MESSAGE));
            return;
        }

        match onestep_ops::start_backup(self.config.clone()) {
            Ok(handle) => {
                self.cancel_preview();
                self.log.clear();
                self.backup_view = BackupView::default();
                self.backup = Some(handle);
            }
            Err(err) => {
                warn!(%err, "backup not started");
                self.notice = Some(Notice::warning(err.to_string()));
            }
        }
    }

    fn cancel_backup(&mut self) {
        match &self.backup {
            Some(handle) if !handle.is_cancelled() => {
                info!("cancelling backup");
                handle.cancel();
                self.log.push("Cancelling...");
            }
            _ => {}
        }
    }

    /// Apply one event from the backup worker.
    pub fn handle_backup_event(&mut self, event: BackupEvent) {
        match event {
            BackupEvent::StateChanged(state) => self.backup_view.state = state,
            BackupEvent::Progress { percent, message } => {
                self.backup_view.percent = percent;
                self.log.push(message.clone());
                self.backup_view.message = Some(message);
            }
            BackupEvent::Complete(outcome) => {
                self.backup = None;
                self.backup_view.state = outcome.state();
                if let BackupOutcome::Completed { bytes, .. } = &outcome {
                    self.log
                        .push(format!("{} ({})", outcome.summary(), format_size(*bytes)));
                } else {
                    self.log.push(outcome.summary());
                }
                self.notice = Some(Notice::for_outcome(&outcome));
            }
        }
    }

    fn handle_worker_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Backup(Some(event)) => self.handle_backup_event(event),
            WorkerMessage::Backup(None) => {
                // Channel closed without a Complete event
                warn!("backup worker stopped unexpectedly");
                self.backup = None;
                self.backup_view.state = BackupState::Failed;
                self.notice = Some(Notice::error("Backup stopped unexpectedly"));
            }
            WorkerMessage::Preview(Some(message)) => self.handle_preview(message),
            WorkerMessage::Preview(None) => {
                self.preview_rx = None;
                self.preview_progress = None;
            }
        }
    }
}

/// Wait for the next message from whichever workers are running.
///
/// Pends forever when neither is.
async fn next_worker_message(
    backup: &mut Option<BackupHandle>,
    preview: &mut Option<mpsc::Receiver<PreviewMessage>>,
) -> WorkerMessage {
    tokio::select! {
        event = async {
            match backup {
                Some(handle) => handle.recv().await,
                None => std::future::pending().await,
            }
        } => WorkerMessage::Backup(event),

        message = async {
            match preview {
                Some(rx) => rx.recv().await,
                None => std::future::pending().await,
            }
        } => WorkerMessage::Preview(message),
    }
}
