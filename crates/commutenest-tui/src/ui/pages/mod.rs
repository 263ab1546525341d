//! One renderer per routed page.

pub mod account;
pub mod dashboard;
pub mod home;
pub mod listings;

use ratatui::{layout::Rect, Frame};

use commutenest_core::router::{Page, RouteMatch};

use crate::app::App;

/// Render the page the gate selected for the current location
pub fn render(frame: &mut Frame, app: &App, route: &RouteMatch, area: Rect) {
    match route.page {
        Page::Home => home::render(frame, app, area),
        Page::Login => account::render_login(frame, app, area),
        Page::Register => account::render_register(frame, app, area),
        Page::Profile => account::render_profile(frame, app, area),
        Page::Dashboard => dashboard::render(frame, app, area),
        Page::Search => listings::render_search(frame, app, area),
        Page::HousingDetail => {
            listings::render_housing_detail(frame, route.param("id").unwrap_or_default(), area)
        }
        Page::Favorites => listings::render_favorites(frame, area),
    }
}
