//! Signed-in landing page summarizing the user's search preferences.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use commutenest_core::User;

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_budget, format_coordinates, format_minutes, truncate_string};

/// Width of the label column
const LABEL_WIDTH: usize = 18;

/// Longest preferred-areas line before truncation
const MAX_AREAS_WIDTH: usize = 60;

fn row(label: &str, value: Option<String>) -> Line<'static> {
    let label = Span::styled(format!("  {:<width$}", label, width = LABEL_WIDTH), styles::muted_style());
    match value {
        Some(value) => Line::from(vec![label, Span::styled(value, styles::text_style())]),
        None => Line::from(vec![label, Span::styled("not set", styles::muted_style())]),
    }
}

/// Preference rows shown on the dashboard
pub fn preference_lines(user: &User) -> Vec<Line<'static>> {
    let work = user.work_location().map(|loc| {
        match (loc.address, loc.coordinates) {
            (Some(address), Some((lat, lng))) => {
                format!("{} ({})", address, format_coordinates(lat, lng))
            }
            (Some(address), None) => address.to_string(),
            (None, Some((lat, lng))) => format_coordinates(lat, lng),
            (None, None) => String::new(),
        }
    });
    let areas = user
        .preferred_areas
        .as_ref()
        .filter(|areas| !areas.is_empty())
        .map(|areas| truncate_string(&areas.join(", "), MAX_AREAS_WIDTH));

    vec![
        row("Work location", work),
        row("Max commute", user.max_commute_time.map(format_minutes)),
        row("Budget", format_budget(user.budget_min, user.budget_max)),
        row("Preferred areas", areas),
    ]
}

/// True when every preference the search relies on is filled in
fn preferences_complete(user: &User) -> bool {
    user.work_location().is_some()
        && user.max_commute_time.is_some()
        && (user.budget_min.is_some() || user.budget_max.is_some())
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(user) = app.user() else {
        return;
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Hello, {}!", user.display_name()),
            styles::title_style(),
        )),
        Line::from(""),
    ];
    lines.extend(preference_lines(user));
    lines.push(Line::from(""));

    if preferences_complete(user) {
        lines.push(Line::from(vec![
            Span::styled("  [s]", styles::key_style()),
            Span::styled(" Search listings   ", styles::text_style()),
            Span::styled("[f]", styles::key_style()),
            Span::styled(" Favorites", styles::text_style()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Your commute profile is incomplete. ", styles::accent_style()),
            Span::styled("[p]", styles::key_style()),
            Span::styled(" Complete your profile", styles::text_style()),
        ]));
    }

    let block = Block::default()
        .title(Span::styled(" Dashboard ", styles::title_style()))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: &str) -> User {
        serde_json::from_str(json).unwrap()
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_unset_preferences_show_not_set() {
        let user = user(r#"{"id": "1", "email": "a@b.com", "username": "ab"}"#);
        let lines = preference_lines(&user);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| text(l).ends_with("not set")));
        assert!(!preferences_complete(&user));
    }

    #[test]
    fn test_preferences_rendered() {
        let user = user(
            r#"{"id": "1", "email": "a@b.com", "username": "ab",
                "work_address": "500 Market St", "work_lat": 37.79, "work_lng": -122.4,
                "max_commute_time": 45, "budget_max": 2600, "preferred_areas": []}"#,
        );
        let lines: Vec<String> = preference_lines(&user).iter().map(text).collect();
        assert!(lines[0].contains("500 Market St (37.7900, -122.4000)"));
        assert!(lines[1].contains("45 min"));
        assert!(lines[2].contains("up to $2,600"));
        assert!(lines[3].ends_with("not set"));
        assert!(preferences_complete(&user));
    }
}
