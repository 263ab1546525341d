use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use commutenest_core::router::{GateDecision, Page};

use crate::app::{App, AppState};

use super::pages;
use super::styles;
use super::widgets::{centered_rect_fixed, logo_lines, visible_tail};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EnteringPath => render_path_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.current_page() {
        Some(page) => format!("  CommuteNest / {}", page.title()),
        None => "  CommuteNest".to_string(),
    };
    let account = title_hints(app);

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + account.chars().count() + 2),
        )),
        Span::styled(account, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

/// Right side of the title bar: who is signed in and the key for help.
/// Form pages take `?` as input, so they advertise how to leave instead.
fn title_hints(app: &App) -> String {
    let hint = if app.form_page().is_some() {
        "[Esc] Leave form"
    } else {
        "[?] Help"
    };
    match app.user() {
        Some(user) => format!("{}  {}", user.email, hint),
        None if app.session.is_loading() => hint.to_string(),
        None => format!("Not signed in  {}", hint),
    }
}

/// Navigation entries for the current session
fn nav_items(app: &App) -> Vec<(&'static str, Option<Page>)> {
    if app.session.is_loading() {
        return vec![];
    }
    if app.user().is_some() {
        vec![
            ("[h]ome", Some(Page::Home)),
            ("[d]ashboard", Some(Page::Dashboard)),
            ("[s]earch", Some(Page::Search)),
            ("[f]avorites", Some(Page::Favorites)),
            ("[p]rofile", Some(Page::Profile)),
            ("l[o]gout", None),
        ]
    } else {
        vec![
            ("[h]ome", Some(Page::Home)),
            ("[l]ogin", Some(Page::Login)),
            ("[r]egister", Some(Page::Register)),
        ]
    }
}

fn render_nav(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.current_page();

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, page)) in nav_items(app).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let selected = page.is_some() && page == current;
        spans.push(Span::styled(label, styles::nav_style(selected)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.decision() {
        GateDecision::Render(route) => pages::render(frame, app, &route, area),
        GateDecision::NotFound(path) => pages::listings::render_not_found(frame, &path, area),
        // Redirects are applied before drawing; a pending one looks like loading
        GateDecision::Placeholder | GateDecision::Redirect(_) => render_loading(frame, area),
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from("")];
    lines.extend(logo_lines());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Loading...", styles::muted_style())));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.location),
    };
    let right_text = " [g]o to | [b]ack | [q]uit ";

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::key_style()),
        Span::styled(desc.to_string(), styles::text_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 26, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = logo_lines();
    help_text.extend([
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::accent_style())),
        help_line("h", "Home"),
        help_line("l / r", "Log in / sign up"),
        help_line("d s f p", "Dashboard, search, favorites, profile"),
        help_line("g", "Go to a path, e.g. /housing/42"),
        help_line("b", "Back"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::accent_style())),
        help_line("Tab / ↓", "Next field"),
        help_line("⇧Tab / ↑", "Previous field"),
        help_line("Enter", "Next field, or submit on the button"),
        help_line("Esc", "Leave the form"),
        Line::from(""),
        Line::from(Span::styled(" Account", styles::accent_style())),
        help_line("u", "Refresh profile"),
        help_line("o", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_path_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Path: ", styles::muted_style()),
            Span::styled(format!("{}▌", visible_tail(&app.path_input)), styles::selected_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  [Enter] go  [Esc] cancel",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(" Go to ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 10, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = logo_lines();
    lines.extend([
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::accent_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
