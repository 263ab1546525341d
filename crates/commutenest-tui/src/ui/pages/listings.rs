//! Listing destinations and the not-found page.
//!
//! Listing search, detail and favorites are served by the housing service's
//! listing endpoints; this client only routes to them.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_budget, format_minutes};

fn render_panel(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

pub fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Listing search", styles::accent_style())),
        Line::from(""),
    ];

    if let Some(user) = app.user() {
        let commute = user
            .max_commute_time
            .map(format_minutes)
            .unwrap_or_else(|| "any commute".to_string());
        let budget = format_budget(user.budget_min, user.budget_max)
            .unwrap_or_else(|| "any budget".to_string());
        lines.push(Line::from(Span::styled(
            format!("Searching within {}, {}.", commute, budget),
            styles::text_style(),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Open a listing with [g] and a path like /housing/42.",
        styles::muted_style(),
    )));

    render_panel(frame, area, "Search", lines);
}

pub fn render_housing_detail(frame: &mut Frame, id: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Listing ", styles::muted_style()),
            Span::styled(id.to_string(), styles::accent_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled("[b] Back", styles::muted_style())),
    ];
    render_panel(frame, area, "Listing", lines);
}

pub fn render_favorites(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Your saved listings", styles::accent_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Listings you save while searching show up here.",
            styles::muted_style(),
        )),
    ];
    render_panel(frame, area, "Favorites", lines);
}

pub fn render_not_found(frame: &mut Frame, path: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Page not found", styles::error_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Nothing lives at ", styles::muted_style()),
            Span::styled(path.to_string(), styles::accent_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled("[h] Home   [b] Back", styles::muted_style())),
    ];
    render_panel(frame, area, "Not found", lines);
}
