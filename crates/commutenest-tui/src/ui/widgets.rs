use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::forms::TextForm;

use super::styles;

/// Visible width of a form field
const FIELD_WIDTH: usize = 30;

/// Width of the label column in forms
const LABEL_WIDTH: usize = 19;

/// Logo shown on the landing page and dialogs
pub const LOGO: [&str; 3] = [
    "  ╔═╗╔═╗╔╦╗╔╦╗╦ ╦╔╦╗╔═╗  ╔╗╔╔═╗╔═╗╔╦╗",
    "  ║  ║ ║║║║║║║║ ║ ║ ║╣   ║║║║╣ ╚═╗ ║ ",
    "  ╚═╝╚═╝╩ ╩╩ ╩╚═╝ ╩ ╚═╝  ╝╚╝╚═╝╚═╝ ╩ ",
];

pub fn logo_lines() -> Vec<Line<'static>> {
    LOGO.iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect()
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// Tail of `value` that fits the field, so the cursor end stays visible
pub fn visible_tail(value: &str) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(FIELD_WIDTH)).collect()
}

/// Render a text form as a bordered dialog centered in `area`.
pub fn render_form(
    frame: &mut Frame,
    area: Rect,
    form: &TextForm,
    title: &str,
    button_label: &str,
    intro: &[Line<'_>],
) {
    let mut lines: Vec<Line> = intro.to_vec();
    if !intro.is_empty() {
        lines.push(Line::from(""));
    }

    for (spec, value, focused) in form.fields() {
        let style = if focused {
            styles::selected_style()
        } else {
            styles::text_style()
        };
        let shown = if spec.secret {
            "*".repeat(value.chars().count().min(FIELD_WIDTH))
        } else {
            visible_tail(value)
        };
        let cursor = if focused { "▌" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!("  {:>width$}: [", spec.label, width = LABEL_WIDTH), styles::muted_style()),
            Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), style),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    let indent = " ".repeat(LABEL_WIDTH + 6);
    if form.button_focused() {
        lines.push(Line::from(vec![
            Span::raw(format!("{}[", indent)),
            Span::styled(format!(" ▶ {} ◀ ", button_label), styles::selected_style()),
            Span::raw("]"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw(format!("{}[", indent)),
            Span::styled(format!("   {}   ", button_label), styles::text_style()),
            Span::raw("]"),
        ]));
    }

    if let Some(ref error) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!("  {}", error), styles::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Tab] next field  [Enter] submit  [Esc] back",
        styles::muted_style(),
    )));

    let width = (LABEL_WIDTH + FIELD_WIDTH + 12) as u16;
    let height = lines.len() as u16 + 2;
    let dialog = centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog);
}
