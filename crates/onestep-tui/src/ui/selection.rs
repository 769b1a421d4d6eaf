//! File type selection dialog: a check box tree of categories and extensions.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use onestep_core::{CategoryTable, ExtensionSet};
use onestep_select::{NodeRef, SelectionError, SelectionTree, TreeRow};

use crate::theme::Theme;

/// State of an open selection dialog.
///
/// Owns its own [`SelectionTree`]; the window's extension set is only
/// replaced when the dialog is accepted.
#[derive(Debug, Clone)]
pub struct SelectionDialog {
    tree: SelectionTree,
    rows: Vec<TreeRow>,
    cursor: usize,
    offset: usize,
}

impl SelectionDialog {
    /// Open the dialog with `current` pre-checked.
    pub fn new(table: &CategoryTable, current: &ExtensionSet) -> Self {
        let tree = SelectionTree::new(table, current);
        let rows = tree.rows();
        Self {
            tree,
            rows,
            cursor: 0,
            offset: 0,
        }
    }

    pub fn tree(&self) -> &SelectionTree {
        &self.tree
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Row under the cursor.
    pub fn current(&self) -> Option<&TreeRow> {
        self.rows.get(self.cursor)
    }

    pub fn move_up(&mut self, by: usize) {
        self.cursor = self.cursor.saturating_sub(by);
    }

    pub fn move_down(&mut self, by: usize) {
        let last = self.rows.len().saturating_sub(1);
        self.cursor = (self.cursor + by).min(last);
    }

    pub fn jump_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }

    /// Toggle the row under the cursor and refresh the visible states.
    pub fn toggle_current(&mut self) -> Result<(), SelectionError> {
        let Some(node) = self.current().map(|row| row.node) else {
            return Ok(());
        };
        self.toggle(node)
    }

    pub fn toggle(&mut self, node: NodeRef) -> Result<(), SelectionError> {
        self.tree.toggle(node)?;
        self.rows = self.tree.rows();
        Ok(())
    }

    /// Close the dialog and hand back the checked extensions.
    pub fn accept(self) -> ExtensionSet {
        self.tree.flatten()
    }

    /// Keep the cursor inside a viewport of `height` rows.
    fn scroll_into_view(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }
}

/// Widget drawing a [`SelectionDialog`] as a centred popup.
pub struct SelectionView<'a> {
    theme: &'a Theme,
    dialog: &'a mut SelectionDialog,
}

impl<'a> SelectionView<'a> {
    pub fn new(theme: &'a Theme, dialog: &'a mut SelectionDialog) -> Self {
        Self { theme, dialog }
    }
}

impl Widget for SelectionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_width = 44.min(area.width.saturating_sub(4));
        let popup_height =
            (self.dialog.rows.len() as u16 + 5).min(area.height.saturating_sub(2));
        let popup_x = (area.width.saturating_sub(popup_width)) / 2 + area.x;
        let popup_y = (area.height.saturating_sub(popup_height)) / 2 + area.y;
        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

        Clear.render(popup_area, buf);

        let block = Block::default()
            .title(" Select File Types ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        // Footer hint takes the last two rows
        let list_height = inner.height.saturating_sub(2) as usize;
        self.dialog.scroll_into_view(list_height);

        let mut lines: Vec<Line> = self
            .dialog
            .rows
            .iter()
            .enumerate()
            .skip(self.dialog.offset)
            .take(list_height)
            .map(|(index, row)| {
                let indent = "  ".repeat(row.depth + 1);
                let label_style = if row.depth == 0 {
                    self.theme.category
                } else {
                    self.theme.extension
                };
                let mut line = Line::from(vec![
                    Span::raw(indent),
                    Span::styled(row.state.marker(), self.theme.marker_style(row.state)),
                    Span::raw(" "),
                    Span::styled(row.label.clone(), label_style),
                ]);
                if index == self.dialog.cursor {
                    line = line.style(self.theme.selected);
                }
                line
            })
            .collect();

        while lines.len() < list_height {
            lines.push(Line::raw(""));
        }

        let selected = self.dialog.tree.flatten().len();
        lines.push(Line::styled(
            format!("  {} extension(s) selected", selected),
            Style::default().fg(self.theme.muted),
        ));
        lines.push(Line::from(vec![
            Span::styled(" Space", self.theme.help_key),
            Span::styled(" toggle ", self.theme.help_desc),
            Span::styled("Enter", self.theme.help_key),
            Span::styled(" ok ", self.theme.help_desc),
            Span::styled("Esc", self.theme.help_key),
            Span::styled(" cancel", self.theme.help_desc.add_modifier(Modifier::DIM)),
        ]));

        Paragraph::new(lines).render(inner, buf);
    }
}
