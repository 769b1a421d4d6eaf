//! Event handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    JumpToTop,
    JumpToBottom,
    PageUp,
    PageDown,

    // Selection
    /// Toggle the check box under the cursor (Space).
    Toggle,

    // Directories
    EditSource,
    EditDestination,

    // Backup
    /// Open the file type dialog.
    SelectTypes,
    StartBackup,
    /// Re-run the preview scan of the source directory.
    Preview,

    // UI toggles
    ToggleHelp,
    ToggleTheme,

    // Confirmation
    Confirm,
    Cancel,

    // Application
    Quit,
    ForceQuit,

    /// No action for this key.
    None,
}

impl KeyAction {
    /// Map a key event to an action.
    ///
    /// The same table serves the main window and the type dialog; each
    /// mode ignores the actions it has no use for.
    pub fn from_key_event(event: KeyEvent) -> Self {
        match (event.code, event.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Self::ForceQuit,
            (KeyCode::Char('q'), KeyModifiers::NONE) => Self::Quit,

            (KeyCode::Char('k') | KeyCode::Up, _) => Self::MoveUp,
            (KeyCode::Char('j') | KeyCode::Down, _) => Self::MoveDown,
            (KeyCode::Char('g') | KeyCode::Home, KeyModifiers::NONE) => Self::JumpToTop,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Self::JumpToBottom,
            (KeyCode::PageUp, _) | (KeyCode::Char('u'), KeyModifiers::CONTROL) => Self::PageUp,
            (KeyCode::PageDown, _) | (KeyCode::Char('d'), KeyModifiers::CONTROL) => Self::PageDown,

            (KeyCode::Char(' '), _) => Self::Toggle,

            (KeyCode::Char('s'), KeyModifiers::NONE) => Self::EditSource,
            (KeyCode::Char('d'), KeyModifiers::NONE) => Self::EditDestination,
            (KeyCode::Char('t'), KeyModifiers::NONE) => Self::SelectTypes,
            (KeyCode::Char('b'), KeyModifiers::NONE) => Self::StartBackup,
            (KeyCode::Char('p'), KeyModifiers::NONE) => Self::Preview,

            (KeyCode::Char('?'), _) => Self::ToggleHelp,
            (KeyCode::Char('T'), _) => Self::ToggleTheme,

            (KeyCode::Enter, _) => Self::Confirm,
            (KeyCode::Esc, _) => Self::Cancel,

            _ => Self::None,
        }
    }
}
