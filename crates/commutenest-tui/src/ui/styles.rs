//! Colors and text styles for the CommuteNest palette.

use ratatui::style::{Color, Modifier, Style};

/// Deep teal used for titles, borders of focused dialogs and the active page
const TEAL: Color = Color::Rgb(38, 166, 154);
/// Warm coral for key hints and callouts
const CORAL: Color = Color::Rgb(240, 128, 96);
const SAGE: Color = Color::Rgb(129, 199, 132);
const BRICK: Color = Color::Rgb(211, 84, 70);
const SLATE: Color = Color::Rgb(120, 134, 150);
const INK: Color = Color::Rgb(22, 36, 46);
const PAPER: Color = Color::Rgb(236, 239, 241);

pub fn title_style() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// Focused form field or button
pub fn selected_style() -> Style {
    Style::default().fg(PAPER).bg(INK).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(PAPER)
}

pub fn muted_style() -> Style {
    Style::default().fg(SLATE)
}

pub fn accent_style() -> Style {
    Style::default().fg(CORAL)
}

/// Keyboard shortcut in hints and help
pub fn key_style() -> Style {
    accent_style().add_modifier(Modifier::BOLD)
}

pub fn success_style() -> Style {
    Style::default().fg(SAGE)
}

pub fn error_style() -> Style {
    Style::default().fg(BRICK)
}

pub fn nav_style(selected: bool) -> Style {
    if selected {
        title_style().add_modifier(Modifier::UNDERLINED)
    } else {
        muted_style()
    }
}

pub fn border_style(focused: bool) -> Style {
    Style::default().fg(if focused { TEAL } else { SLATE })
}

pub fn status_bar_style() -> Style {
    Style::default().bg(INK).fg(PAPER)
}
