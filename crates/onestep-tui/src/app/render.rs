//! Rendering of the main window and its overlays.

use std::path::Path;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use ratatui::Frame;

use onestep_ops::BackupState;

use super::state::{AppMode, NoticeLevel};
use super::App;
use crate::theme::Theme;
use crate::ui::{
    progress_line, truncate_left, AppLayout, HelpOverlay, PathPromptModal, SelectionView,
};

/// Draw the whole UI for one frame.
pub(super) fn draw(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let layout = AppLayout::new(area);
    let buf = frame.buffer_mut();

    render_header(app, layout.header, buf);
    render_settings(app, layout.settings, buf);
    render_progress(app, layout.progress, buf);
    render_messages(app, layout.messages, buf);
    render_footer(app, layout.footer, buf);

    match app.mode {
        AppMode::EditingSource | AppMode::EditingDestination => {
            if let Some(input) = &app.input {
                let modal = PathPromptModal::new(&app.theme, input);
                let (x, y) = modal.cursor_position(area);
                modal.render(area, frame.buffer_mut());
                frame.set_cursor_position((x, y));
            }
        }
        AppMode::SelectingTypes => {
            if let Some(dialog) = &mut app.dialog {
                SelectionView::new(&app.theme, dialog).render(area, frame.buffer_mut());
            }
        }
        AppMode::Help => HelpOverlay::new(&app.theme).render(area, frame.buffer_mut()),
        AppMode::Normal | AppMode::Quit => {}
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    buf.set_style(area, app.theme.header);
    let line = Line::from(vec![
        Span::styled(" onestep ", app.theme.title),
        Span::styled("copy selected file types in one step", app.theme.header),
    ]);
    buf.set_line(area.x, area.y, &line, area.width);
}

fn render_settings(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Backup ")
        .title_style(app.theme.title)
        .borders(Borders::ALL)
        .border_style(app.theme.border);
    let inner = block.inner(area);
    block.render(area, buf);

    let width = (inner.width as usize).saturating_sub(15);
    let types = if app.config.extensions.is_empty() {
        Span::styled("(none selected)", app.theme.placeholder)
    } else {
        let listed = app.config.extensions.to_string();
        let count = app.config.extensions.len();
        Span::styled(
            truncate_right(&format!("{listed} ({count})"), width),
            app.theme.value,
        )
    };

    let lines = vec![
        setting_line(&app.theme, "s", "Source", app.config.source.as_deref(), width),
        setting_line(
            &app.theme,
            "d",
            "Destination",
            app.config.destination.as_deref(),
            width,
        ),
        Line::from(vec![
            Span::styled(" t ", app.theme.help_key),
            Span::styled(format!("{:<11} ", "File types"), app.theme.label),
            types,
        ]),
    ];
    Paragraph::new(lines).render(inner, buf);
}

fn setting_line<'a>(
    theme: &Theme,
    key: &'a str,
    label: &'a str,
    path: Option<&Path>,
    width: usize,
) -> Line<'a> {
    let value = match path {
        Some(path) => Span::styled(
            truncate_left(&path.display().to_string(), width),
            theme.value,
        ),
        None => Span::styled("(not selected)", theme.placeholder),
    };
    Line::from(vec![
        Span::styled(format!(" {key} "), theme.help_key),
        Span::styled(format!("{:<11} ", label), theme.label),
        value,
    ])
}

fn truncate_right(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{keep}...")
}

fn render_progress(app: &App, area: Rect, buf: &mut Buffer) {
    let view = &app.backup_view;
    let state_style = match view.state {
        BackupState::Completed => Style::default().fg(app.theme.success),
        BackupState::Failed => Style::default().fg(app.theme.error),
        BackupState::Cancelled | BackupState::NoFilesFound => Style::default().fg(app.theme.warning),
        BackupState::Scanning | BackupState::Copying => Style::default().fg(app.theme.info),
        BackupState::Idle => Style::default().fg(app.theme.muted),
    };

    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(" Progress ", app.theme.title),
            Span::styled(format!("{} ", view.state), state_style.add_modifier(Modifier::BOLD)),
        ]))
        .borders(Borders::ALL)
        .border_style(app.theme.border);
    let inner = block.inner(area);
    block.render(area, buf);

    let line = match &app.preview_progress {
        Some(progress) if view.state == BackupState::Idle => Line::styled(
            format!(
                " Scanning... {} files seen, {} matching",
                progress.files_seen, progress.files_matched
            ),
            Style::default().fg(app.theme.info),
        ),
        _ => progress_line(&app.theme, view.percent, inner.width),
    };
    buf.set_line(inner.x, inner.y, &line, inner.width);
}

fn render_messages(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(" Files ")
        .title_style(app.theme.title)
        .borders(Borders::ALL)
        .border_style(app.theme.border);
    let inner = block.inner(area);
    block.render(area, buf);

    if app.log.is_empty() {
        let hint = Line::styled(
            " Choose a source (s), a destination (d) and file types (t), then press Enter.",
            app.theme.placeholder,
        );
        buf.set_line(inner.x, inner.y, &hint, inner.width);
        return;
    }

    let lines: Vec<Line> = app
        .log
        .visible(inner.height as usize)
        .map(|text| Line::styled(format!(" {text}"), Style::default().fg(app.theme.foreground)))
        .collect();
    Paragraph::new(lines).render(inner, buf);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(notice) = &app.notice {
        let color = match notice.level {
            NoticeLevel::Info => app.theme.info,
            NoticeLevel::Success => app.theme.success,
            NoticeLevel::Warning => app.theme.warning,
            NoticeLevel::Error => app.theme.error,
        };
        let style = app.theme.footer.fg(color).add_modifier(Modifier::BOLD);
        buf.set_style(area, style);
        let line = Line::from(vec![
            Span::styled(format!(" {} ", notice.text), style),
            Span::styled(" (press any key)", app.theme.footer),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
        return;
    }

    buf.set_style(area, app.theme.footer);
    let hints: &[(&str, &str)] = if app.is_busy() {
        &[("Esc", "cancel"), ("j/k", "scroll"), ("q", "quit")]
    } else {
        &[
            ("Enter", "backup"),
            ("p", "preview"),
            ("j/k", "scroll"),
            ("?", "help"),
            ("q", "quit"),
        ]
    };
    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in hints {
        spans.push(Span::styled(*key, app.theme.help_key));
        spans.push(Span::styled(format!(" {desc}  "), app.theme.footer));
    }
    buf.set_line(area.x, area.y, &Line::from(spans), area.width);
}
