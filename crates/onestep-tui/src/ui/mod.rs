//! UI components and widgets.

mod help;
pub mod modals;
mod selection;

pub use help::HelpOverlay;
pub use modals::{progress_line, PathPromptModal};
pub use selection::{SelectionDialog, SelectionView};

use ratatui::layout::{Constraint, Layout, Rect};

/// Layout areas for the main window.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub header: Rect,
    /// Source, destination and file types.
    pub settings: Rect,
    pub progress: Rect,
    /// Preview listing and progress messages.
    pub messages: Rect,
    pub footer: Rect,
}

impl AppLayout {
    /// Compute layout from terminal area.
    pub fn new(area: Rect) -> Self {
        let [header, settings, progress, messages, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            header,
            settings,
            progress,
            messages,
            footer,
        }
    }
}

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Shorten `text` to `max` characters, keeping the end.
///
/// Paths are most recognisable by their last components.
pub fn truncate_left(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    if max <= 3 {
        return ".".repeat(max);
    }
    let keep: String = text.chars().skip(len - (max - 3)).collect();
    format!("...{keep}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_left() {
        assert_eq!(truncate_left("/a/b", 10), "/a/b");
        assert_eq!(truncate_left("/home/user/Pictures", 10), "...ictures");
        assert_eq!(truncate_left("/home/user/Pictures", 2), "..");
    }
}
