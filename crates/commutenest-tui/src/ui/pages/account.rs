//! Login, sign-up and profile forms.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    Frame,
};

use crate::app::App;
use crate::ui::{styles, widgets};

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let intro = [Line::from(Span::styled(
        "  Log in to see listings matched to your commute.",
        styles::muted_style(),
    ))];
    widgets::render_form(frame, area, &app.login_form, "Log in", "Log in", &intro);
}

pub fn render_register(frame: &mut Frame, app: &App, area: Rect) {
    let intro = [Line::from(Span::styled(
        "  Create an account. Names are optional.",
        styles::muted_style(),
    ))];
    widgets::render_form(frame, area, &app.register_form, "Sign up", "Create account", &intro);
}

pub fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let mut intro = Vec::new();
    if let Some(user) = app.user() {
        intro.push(Line::from(vec![
            Span::styled("  Signed in as ", styles::muted_style()),
            Span::styled(user.email.clone(), styles::accent_style()),
            Span::styled(format!(" ({})", user.username), styles::muted_style()),
        ]));
    }
    intro.push(Line::from(Span::styled(
        "  Separate preferred areas with commas. Blank fields are left unchanged.",
        styles::muted_style(),
    )));
    widgets::render_form(frame, area, &app.profile_form, "Profile", "Save", &intro);
}
