//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! navigation requests and account actions on the `App`.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use commutenest_core::router::{DASHBOARD_PATH, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use commutenest_core::Page;

use crate::app::{App, AppState};
use crate::forms::TextForm;

const SEARCH_PATH: &str = "/search";
const FAVORITES_PATH: &str = "/favorites";
const PROFILE_PATH: &str = "/profile";

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    if matches!(app.state, AppState::EnteringPath) {
        handle_path_input(app, key);
        return Ok(false);
    }

    // Form pages capture typing
    if let Some(page) = app.form_page() {
        handle_form_input(app, page, key).await;
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('g') => app.start_path_entry(),
        KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Char('h') => app.navigate(HOME_PATH),
        KeyCode::Char('l') => app.navigate(LOGIN_PATH),
        KeyCode::Char('r') => app.navigate(REGISTER_PATH),
        KeyCode::Char('d') => app.navigate(DASHBOARD_PATH),
        KeyCode::Char('s') => app.navigate(SEARCH_PATH),
        KeyCode::Char('f') => app.navigate(FAVORITES_PATH),
        KeyCode::Char('p') => app.navigate(PROFILE_PATH),
        KeyCode::Char('o') => app.logout(),
        KeyCode::Char('u') => app.refresh_profile().await,
        _ => {}
    }
    Ok(false)
}

fn handle_path_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.path_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.submit_path(),
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => app.push_path_char(c),
        _ => {}
    }
}

fn form_for(app: &mut App, page: Page) -> &mut TextForm {
    match page {
        Page::Register => &mut app.register_form,
        Page::Profile => &mut app.profile_form,
        _ => &mut app.login_form,
    }
}

async fn handle_form_input(app: &mut App, page: Page, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            form_for(app, page).error = None;
            if app.can_go_back() {
                app.back();
            } else {
                app.navigate(HOME_PATH);
            }
        }
        KeyCode::Down | KeyCode::Tab => form_for(app, page).next_field(),
        KeyCode::Up | KeyCode::BackTab => form_for(app, page).prev_field(),
        KeyCode::Enter => {
            if !form_for(app, page).button_focused() {
                form_for(app, page).next_field();
                return;
            }
            match page {
                Page::Login => {
                    app.attempt_login().await;
                }
                Page::Register => {
                    app.attempt_register().await;
                }
                Page::Profile => {
                    app.save_profile().await;
                }
                _ => {}
            }
        }
        KeyCode::Backspace => form_for(app, page).backspace(),
        KeyCode::Char(c) => {
            form_for(app, page).push_char(c);
        }
        _ => {}
    }
}
