//! Landing page.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::{styles, widgets};

const FEATURES: [(&str, &str); 3] = [
    ("Commute first", "Tell us where you work and how long you're willing to travel."),
    ("Your budget", "Set a monthly range and skip listings you would never rent."),
    ("Your neighborhoods", "Pick the areas you love; we'll keep them front and center."),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from("")];
    lines.extend(widgets::logo_lines());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Find a home that fits your commute",
        styles::accent_style(),
    )));
    lines.push(Line::from(Span::styled(
        "Housing search matched to the way you get to work.",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));

    for (title, text) in FEATURES {
        lines.push(Line::from(vec![
            Span::styled(format!("{}  ", title), styles::title_style()),
            Span::styled(text, styles::text_style()),
        ]));
    }
    lines.push(Line::from(""));

    let cta = match app.user() {
        Some(user) => vec![
            Span::styled(format!("Welcome back, {}.  ", user.display_name()), styles::success_style()),
            Span::styled("[d]", styles::key_style()),
            Span::styled(" Go to your dashboard", styles::text_style()),
        ],
        None => vec![
            Span::styled("[r]", styles::key_style()),
            Span::styled(" Get started    ", styles::text_style()),
            Span::styled("[l]", styles::key_style()),
            Span::styled(" Log in", styles::text_style()),
        ],
    };
    lines.push(Line::from(cta));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
