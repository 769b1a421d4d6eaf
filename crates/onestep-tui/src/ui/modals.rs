//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use onestep_core::DirectoryRole;

use crate::app::input::InputState;
use crate::theme::Theme;
use crate::ui::truncate_left;

/// Prompt for typing a directory path.
pub struct PathPromptModal<'a> {
    theme: &'a Theme,
    input: &'a InputState,
}

impl<'a> PathPromptModal<'a> {
    pub fn new(theme: &'a Theme, input: &'a InputState) -> Self {
        Self { theme, input }
    }

    /// Terminal cursor position for the prompt drawn in `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner = Self::popup_area(area).inner(ratatui::layout::Margin::new(1, 1));
        let field_width = inner.width.saturating_sub(4) as usize;
        let typed = self.input.before_cursor().width().min(field_width);
        (inner.x + 2 + typed as u16, inner.y + 1)
    }

    fn popup_area(area: Rect) -> Rect {
        let popup_width = 70.min(area.width.saturating_sub(4));
        let popup_height = 7.min(area.height);
        let popup_x = (area.width.saturating_sub(popup_width)) / 2 + area.x;
        let popup_y = (area.height.saturating_sub(popup_height)) / 2 + area.y;
        Rect::new(popup_x, popup_y, popup_width, popup_height)
    }
}

impl Widget for PathPromptModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = Self::popup_area(area);
        Clear.render(popup_area, buf);

        let title = match self.input.role {
            DirectoryRole::Source => " Source Directory ",
            DirectoryRole::Destination => " Destination Directory ",
        };
        let block = Block::default()
            .title(title)
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        let field_width = inner.width.saturating_sub(4) as usize;
        let shown = if self.input.buffer().width() > field_width {
            truncate_left(self.input.buffer(), field_width)
        } else {
            self.input.buffer().to_string()
        };

        let mut lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::styled("> ", self.theme.help_key),
                Span::styled(shown, self.theme.value),
            ]),
            Line::raw(""),
        ];

        match self.input.error() {
            Some(error) => lines.push(Line::styled(
                format!("  {error}"),
                Style::default().fg(self.theme.error),
            )),
            None => lines.push(Line::from(vec![
                Span::styled("  Enter", self.theme.help_key),
                Span::styled(" confirm  ", self.theme.help_desc),
                Span::styled("Esc", self.theme.help_key),
                Span::styled(" cancel  ", self.theme.help_desc),
                Span::styled("~", self.theme.help_key),
                Span::styled(" home", self.theme.help_desc),
            ])),
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// A one-line `[████░░░░] 42%` bar filling `width` columns.
pub fn progress_line(theme: &Theme, percent: u8, width: u16) -> Line<'static> {
    let pct = percent.min(100) as usize;
    let bar_width = (width as usize).saturating_sub(8);
    let filled = (pct * bar_width) / 100;
    let empty = bar_width.saturating_sub(filled);

    Line::from(vec![
        Span::raw(" ["),
        Span::styled("\u{2588}".repeat(filled), theme.progress_bar),
        Span::styled("\u{2591}".repeat(empty), theme.progress_bg),
        Span::styled(
            format!("] {:>3}%", pct),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_progress_line_fills_proportionally() {
        let theme = Theme::dark();
        let line = progress_line(&theme, 50, 28);
        let text = bar_text(&line);
        assert_eq!(text.matches('\u{2588}').count(), 10);
        assert_eq!(text.matches('\u{2591}').count(), 10);
        assert!(text.ends_with("]  50%"));
    }

    #[test]
    fn test_progress_line_bounds() {
        let theme = Theme::dark();
        let full = bar_text(&progress_line(&theme, 100, 18));
        assert_eq!(full.matches('\u{2591}').count(), 0);
        let tiny = bar_text(&progress_line(&theme, 30, 4));
        assert!(tiny.ends_with("]  30%"));
    }
}
