//! Help overlay widget.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::theme::Theme;

struct HelpSection {
    title: &'static str,
    bindings: &'static [(&'static str, &'static str)],
}

const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Backup",
        bindings: &[
            ("s", "Set source directory"),
            ("d", "Set destination directory"),
            ("t", "Choose file types"),
            ("Enter / b", "Start backup"),
            ("p", "Preview matching files"),
            ("Esc", "Cancel running backup"),
        ],
    },
    HelpSection {
        title: "File types",
        bindings: &[
            ("j / k", "Move down / up"),
            ("Space", "Toggle check box"),
            ("Enter", "Accept selection"),
            ("Esc", "Discard changes"),
        ],
    },
    HelpSection {
        title: "General",
        bindings: &[
            ("j / k", "Scroll messages"),
            ("T", "Toggle theme"),
            ("?", "Toggle help"),
            ("q", "Quit"),
        ],
    },
];

/// Help overlay showing key bindings organized by section.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(60, 80, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Help ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        for section in HELP_SECTIONS {
            lines.push(Line::from(Span::styled(
                section.title,
                Style::default()
                    .fg(self.theme.info)
                    .add_modifier(Modifier::BOLD),
            )));
            for (keys, description) in section.bindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("{:>12}", keys), self.theme.help_key),
                    Span::styled(format!("  {}", description), self.theme.help_desc),
                ]));
            }
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(
            "Press any key to close",
            Style::default().fg(self.theme.muted),
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Center a rect of the given percentage size inside `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, center, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center);

    center
}
