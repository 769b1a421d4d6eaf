//! Input state for the directory path prompts.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use onestep_core::DirectoryRole;

/// State for a single-line path prompt.
///
/// The cursor counts characters, not bytes, so non-ASCII paths edit
/// correctly.
#[derive(Debug, Clone)]
pub struct InputState {
    buffer: String,
    cursor: usize,
    error: Option<String>,
    /// Which directory the prompt edits.
    pub role: DirectoryRole,
}

impl InputState {
    /// Create an empty prompt for the given directory.
    pub fn new(role: DirectoryRole) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            error: None,
            role,
        }
    }

    /// Create a prompt pre-filled with the current value.
    pub fn with_initial(role: DirectoryRole, value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.chars().count(),
            error: None,
            role,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor, used to place the terminal cursor.
    pub fn before_cursor(&self) -> &str {
        &self.buffer[..self.byte_offset(self.cursor)]
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        self.clear_error();

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => InputResult::Submit(self.buffer.clone()),
            (KeyCode::Esc, _) => InputResult::Cancel,

            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
                InputResult::Continue
            }

            (KeyCode::Delete, _) => {
                if self.cursor < self.char_len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
                InputResult::Continue
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }

            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                InputResult::Continue
            }

            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                InputResult::Continue
            }

            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.char_len();
                InputResult::Continue
            }

            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.buffer.clear();
                self.cursor = 0;
                InputResult::Continue
            }

            (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.truncate(at);
                InputResult::Continue
            }

            // Ctrl-W deletes back to the previous path separator
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor > 0 {
                    let end = self.byte_offset(self.cursor);
                    let before = self.buffer[..end].trim_end_matches(std::path::MAIN_SEPARATOR);
                    let start = before
                        .rfind(std::path::MAIN_SEPARATOR)
                        .map(|i| i + 1)
                        .unwrap_or(0);
                    self.buffer.replace_range(start..end, "");
                    self.cursor = self.buffer[..start].chars().count();
                }
                InputResult::Continue
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
                InputResult::Continue
            }

            _ => InputResult::Continue,
        }
    }

    /// Validate the buffer as a directory path and resolve it.
    ///
    /// A leading `~` expands to the home directory and relative paths are
    /// made absolute. The source must be an existing directory; the
    /// destination may be missing (the backup creates it) but must not be
    /// a file.
    pub fn resolve_directory(&self) -> Result<PathBuf, String> {
        let raw = self.buffer.trim();
        if raw.is_empty() {
            return Err("Path cannot be empty".into());
        }

        let expanded = expand_home(raw);
        let path = std::path::absolute(&expanded)
            .map_err(|e| format!("Cannot resolve {}: {}", expanded.display(), e))?;

        match self.role {
            DirectoryRole::Source if !path.is_dir() => {
                Err(format!("Not a directory: {}", path.display()))
            }
            DirectoryRole::Destination if path.exists() && !path.is_dir() => {
                Err(format!("Exists and is not a directory: {}", path.display()))
            }
            _ => Ok(path),
        }
    }
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(std::path::MAIN_SEPARATOR) => rest,
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(std::path::MAIN_SEPARATOR)),
        None => PathBuf::from(raw),
    }
}

/// Display form of an optional directory for pre-filling a prompt.
pub fn prefill(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

/// Result of handling input.
#[derive(Debug, Clone)]
pub enum InputResult {
    /// Continue accepting input.
    Continue,
    /// User cancelled the input.
    Cancel,
    /// User submitted the input with this value.
    Submit(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use tempfile::TempDir;

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(input: &mut InputState, text: &str) {
        for c in text.chars() {
            input.handle_key(key_event(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn test_input_basic() {
        let mut input = InputState::new(DirectoryRole::Source);
        type_str(&mut input, "/tmp");

        assert_eq!(input.buffer(), "/tmp");
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_input_non_ascii_editing() {
        let mut input = InputState::with_initial(DirectoryRole::Source, "/fotos/año");
        input.handle_key(key_event(KeyCode::Left, KeyModifiers::NONE));
        input.handle_key(key_event(KeyCode::Backspace, KeyModifiers::NONE));

        assert_eq!(input.buffer(), "/fotos/ao");
        assert_eq!(input.before_cursor(), "/fotos/a");

        type_str(&mut input, "ñ");
        assert_eq!(input.buffer(), "/fotos/año");
    }

    #[test]
    fn test_input_cursor_movement() {
        let mut input = InputState::with_initial(DirectoryRole::Destination, "test");

        input.handle_key(key_event(KeyCode::Home, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 0);

        input.handle_key(key_event(KeyCode::End, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 4);

        input.handle_key(key_event(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 3);

        input.handle_key(key_event(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_ctrl_w_deletes_path_component() {
        let mut input = InputState::with_initial(DirectoryRole::Source, "/home/user/Pictures/");
        input.handle_key(key_event(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(input.buffer(), "/home/user/");

        input.handle_key(key_event(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert_eq!(input.buffer(), "/home/");
    }

    #[test]
    fn test_resolve_source_must_exist() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let ok = InputState::with_initial(DirectoryRole::Source, &temp.path().display().to_string());
        assert_eq!(ok.resolve_directory().unwrap(), temp.path());

        let missing = InputState::with_initial(
            DirectoryRole::Source,
            &temp.path().join("missing").display().to_string(),
        );
        assert!(missing.resolve_directory().is_err());

        let not_dir = InputState::with_initial(DirectoryRole::Source, &file.display().to_string());
        assert!(not_dir.resolve_directory().is_err());

        assert!(InputState::new(DirectoryRole::Source).resolve_directory().is_err());
    }

    #[test]
    fn test_resolve_destination_may_be_missing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("new").join("backup");
        let input = InputState::with_initial(DirectoryRole::Destination, &target.display().to_string());
        assert_eq!(input.resolve_directory().unwrap(), target);

        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let blocked = InputState::with_initial(DirectoryRole::Destination, &file.display().to_string());
        assert!(blocked.resolve_directory().is_err());
    }

    #[test]
    fn test_submit_and_cancel() {
        let mut input = InputState::with_initial(DirectoryRole::Source, "test");

        let result = input.handle_key(key_event(KeyCode::Enter, KeyModifiers::NONE));
        assert!(matches!(result, InputResult::Submit(s) if s == "test"));

        let result = input.handle_key(key_event(KeyCode::Esc, KeyModifiers::NONE));
        assert!(matches!(result, InputResult::Cancel));
    }
}
