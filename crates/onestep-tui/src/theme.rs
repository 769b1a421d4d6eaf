//! Color theme for the TUI.
//!
//! Dark and light themes on a slate palette, with semantic styles for the
//! check box tree, the progress gauge and status notices.

use ratatui::style::{Color, Modifier, Style};

use onestep_core::SelectionState;

/// Theme variant (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub variant: ThemeVariant,

    // Base colors
    pub foreground: Color,
    pub muted: Color,

    pub selected: Style,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // UI elements
    pub border: Style,
    pub title: Style,
    pub label: Style,
    pub value: Style,
    pub placeholder: Style,
    pub help_key: Style,
    pub help_desc: Style,

    // Check box tree
    pub category: Style,
    pub extension: Style,
    pub checked: Style,
    pub partial: Style,
    pub unchecked: Style,

    // Progress
    pub progress_bar: Style,
    pub progress_bg: Style,

    // Header/Footer
    pub header: Style,
    pub footer: Style,

    pub input_cursor: Style,
}

impl Theme {
    /// Dark theme using a slate-based palette.
    pub fn dark() -> Self {
        let slate_50 = Color::Rgb(248, 250, 252);
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_300 = Color::Rgb(203, 213, 225);
        let slate_400 = Color::Rgb(148, 163, 184);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_600 = Color::Rgb(71, 85, 105);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_800 = Color::Rgb(30, 41, 59);

        let blue_400 = Color::Rgb(96, 165, 250);
        let blue_500 = Color::Rgb(59, 130, 246);
        let green_500 = Color::Rgb(34, 197, 94);
        let yellow_500 = Color::Rgb(234, 179, 8);
        let red_500 = Color::Rgb(239, 68, 68);
        let amber_500 = Color::Rgb(245, 158, 11);

        Self {
            variant: ThemeVariant::Dark,
            foreground: slate_100,
            muted: slate_500,

            selected: Style::new().bg(slate_700).fg(slate_50).add_modifier(Modifier::BOLD),

            success: green_500,
            warning: yellow_500,
            error: red_500,
            info: blue_400,

            border: Style::new().fg(slate_600),
            title: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            label: Style::new().fg(slate_400),
            value: Style::new().fg(slate_100),
            placeholder: Style::new().fg(slate_500).add_modifier(Modifier::ITALIC),
            help_key: Style::new().fg(blue_400).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(slate_400),

            category: Style::new().fg(blue_500).add_modifier(Modifier::BOLD),
            extension: Style::new().fg(slate_300),
            checked: Style::new().fg(green_500).add_modifier(Modifier::BOLD),
            partial: Style::new().fg(amber_500).add_modifier(Modifier::BOLD),
            unchecked: Style::new().fg(slate_500),

            progress_bar: Style::new().fg(blue_500),
            progress_bg: Style::new().fg(slate_700),

            header: Style::new().bg(slate_800).fg(slate_100),
            footer: Style::new().bg(slate_800).fg(slate_400),

            input_cursor: Style::new().add_modifier(Modifier::REVERSED),
        }
    }

    /// Light theme using a slate-based palette.
    pub fn light() -> Self {
        let slate_100 = Color::Rgb(241, 245, 249);
        let slate_200 = Color::Rgb(226, 232, 240);
        let slate_400 = Color::Rgb(148, 163, 184);
        let slate_500 = Color::Rgb(100, 116, 139);
        let slate_600 = Color::Rgb(71, 85, 105);
        let slate_700 = Color::Rgb(51, 65, 85);
        let slate_800 = Color::Rgb(30, 41, 59);
        let slate_900 = Color::Rgb(15, 23, 42);

        let blue_600 = Color::Rgb(37, 99, 235);
        let blue_700 = Color::Rgb(29, 78, 216);
        let green_600 = Color::Rgb(22, 163, 74);
        let yellow_600 = Color::Rgb(202, 138, 4);
        let red_600 = Color::Rgb(220, 38, 38);
        let amber_600 = Color::Rgb(217, 119, 6);

        Self {
            variant: ThemeVariant::Light,
            foreground: slate_900,
            muted: slate_500,

            selected: Style::new().bg(slate_200).fg(slate_900).add_modifier(Modifier::BOLD),

            success: green_600,
            warning: yellow_600,
            error: red_600,
            info: blue_600,

            border: Style::new().fg(slate_400),
            title: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            label: Style::new().fg(slate_600),
            value: Style::new().fg(slate_900),
            placeholder: Style::new().fg(slate_400).add_modifier(Modifier::ITALIC),
            help_key: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            help_desc: Style::new().fg(slate_600),

            category: Style::new().fg(blue_700).add_modifier(Modifier::BOLD),
            extension: Style::new().fg(slate_700),
            checked: Style::new().fg(green_600).add_modifier(Modifier::BOLD),
            partial: Style::new().fg(amber_600).add_modifier(Modifier::BOLD),
            unchecked: Style::new().fg(slate_400),

            progress_bar: Style::new().fg(blue_600),
            progress_bg: Style::new().fg(slate_200),

            header: Style::new().bg(slate_100).fg(slate_800),
            footer: Style::new().bg(slate_100).fg(slate_600),

            input_cursor: Style::new().add_modifier(Modifier::REVERSED),
        }
    }

    /// Toggle between dark and light themes.
    pub fn toggle(&self) -> Self {
        match self.variant {
            ThemeVariant::Dark => Self::light(),
            ThemeVariant::Light => Self::dark(),
        }
    }

    /// Style for a check box marker in the given state.
    pub fn marker_style(&self, state: SelectionState) -> Style {
        match state {
            SelectionState::Checked => self.checked,
            SelectionState::Partial => self.partial,
            SelectionState::Unchecked => self.unchecked,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        let theme = Theme::dark();
        assert_eq!(theme.toggle().variant, ThemeVariant::Light);
        assert_eq!(theme.toggle().toggle().variant, ThemeVariant::Dark);
    }

    #[test]
    fn test_marker_styles_differ() {
        let theme = Theme::dark();
        assert_ne!(
            theme.marker_style(SelectionState::Checked),
            theme.marker_style(SelectionState::Unchecked)
        );
        assert_ne!(
            theme.marker_style(SelectionState::Partial),
            theme.marker_style(SelectionState::Checked)
        );
    }
}
