//! Application state management for CommuteNest.
//!
//! This module contains the core `App` struct that owns the session, the
//! current location and form state, and coordinates the background session
//! bootstrap with the terminal event loop.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use commutenest_core::auth::{resolve_identity, Resolution};
use commutenest_core::router::{self, GateDecision, Page, HOME_PATH};
use commutenest_core::{
    AuthClient, AuthError, AuthResponse, Config, Gate, SessionProvider, StoredToken, TokenStore,
    User,
};

use crate::forms::{self, TextForm, LOGIN_FIELDS, PROFILE_FIELDS, REGISTER_FIELDS};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum number of locations kept for going back.
const MAX_HISTORY: usize = 50;

/// Redirect hops followed before giving up on a location.
const MAX_REDIRECTS: usize = 4;

/// Maximum length of a typed path.
const MAX_PATH_LENGTH: usize = 200;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EnteringPath,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Results delivered by background tasks to the event loop.
#[derive(Debug)]
enum BackgroundResult {
    /// Startup identity resolution finished
    SessionResolved(Resolution),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    config_path: PathBuf,
    /// Anonymous client; authenticated copies are derived from the session token
    api: AuthClient,
    tokens: TokenStore,
    pub session: SessionProvider,
    gate: Gate,

    pub state: AppState,
    /// Path currently requested by the user
    pub location: String,
    history: Vec<String>,
    pub path_input: String,

    pub login_form: TextForm,
    pub register_form: TextForm,
    pub profile_form: TextForm,

    pub status_message: Option<String>,

    background_rx: mpsc::Receiver<BackgroundResult>,
    background_tx: mpsc::Sender<BackgroundResult>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let api = AuthClient::new(&config.api_base_url(), config.request_timeout())?;
        info!(base_url = api.base_url(), "Housing service configured");

        let config_path = Config::config_path().unwrap_or_else(|_| PathBuf::from("./config.json"));

        Ok(Self::with_parts(config, config_path, api, TokenStore::new(cache_dir)))
    }

    pub fn with_parts(
        config: Config,
        config_path: PathBuf,
        api: AuthClient,
        tokens: TokenStore,
    ) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let mut login_form = TextForm::new(LOGIN_FIELDS);
        if let Some(email) = config.default_email() {
            forms::prefill_login_email(&mut login_form, &email);
        }

        Self {
            config,
            config_path,
            api,
            tokens,
            session: SessionProvider::new(),
            gate: Gate::default(),

            state: AppState::Normal,
            location: HOME_PATH.to_string(),
            history: Vec::new(),
            path_input: String::new(),

            login_form,
            register_form: TextForm::new(REGISTER_FIELDS),
            profile_form: TextForm::new(PROFILE_FIELDS),

            status_message: None,

            background_rx: rx,
            background_tx: tx,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Resolve the stored token in the background. Until the result arrives
    /// the gate shows a placeholder for every location.
    pub fn start_session_bootstrap(&self) {
        let stored = match self.tokens.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to load stored token");
                None
            }
        };

        if let Some(ref token) = stored {
            debug!(minutes_left = token.minutes_until_expiry(), "Found stored token");
        }

        let api = self.api.clone();
        let tx = self.background_tx.clone();
        tokio::spawn(async move {
            let resolution = resolve_identity(&api, stored).await;
            if tx.send(BackgroundResult::SessionResolved(resolution)).await.is_err() {
                debug!("Event loop gone before session resolved");
            }
        });
    }

    /// Apply results from background tasks
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.background_rx.try_recv() {
            match result {
                BackgroundResult::SessionResolved(resolution) => {
                    let anonymous = resolution == Resolution::Anonymous;
                    if self.session.finish_resolution(resolution) {
                        if anonymous {
                            self.forget_token();
                        }
                        self.settle();
                    }
                }
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Client carrying the session token, if signed in
    fn authed_api(&self) -> Option<AuthClient> {
        self.session
            .token()
            .map(|token| self.api.with_token(token.to_string()))
    }

    fn forget_token(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to remove stored token");
        }
    }

    /// Persist and adopt a fresh sign-in
    fn complete_sign_in(&mut self, response: AuthResponse) {
        if let Err(e) = self.tokens.save(&StoredToken::from_response(&response)) {
            warn!(error = %e, "Failed to save token");
        }

        self.config.last_email = Some(response.user.email.clone());
        if let Err(e) = self.config.save_to(&self.config_path) {
            warn!(error = %e, "Failed to save config");
        }

        self.status_message = Some(format!("Welcome, {}", response.user.display_name()));
        self.session.sign_in(response);
        self.settle();
    }

    /// The service rejected our token: drop the session and send the user to login
    fn session_expired(&mut self) {
        self.session.sign_out();
        self.forget_token();
        self.login_form.error = Some(AuthError::Unauthorized.user_message());
        self.settle();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn decision(&self) -> GateDecision {
        self.gate.decide(&self.session.session(), &self.location)
    }

    /// Page being rendered, if the gate allows one
    pub fn current_page(&self) -> Option<Page> {
        match self.decision() {
            GateDecision::Render(route) => Some(route.page),
            _ => None,
        }
    }

    /// Current page when it is a form that captures typed keys
    pub fn form_page(&self) -> Option<Page> {
        self.current_page()
            .filter(|page| matches!(page, Page::Login | Page::Register | Page::Profile))
    }

    /// Request a new location, remembering the current one for `back`
    pub fn navigate(&mut self, path: &str) {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        if router::normalize(&path) == router::normalize(&self.location) {
            return;
        }

        self.history.push(std::mem::replace(&mut self.location, path));
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.status_message = None;
        self.settle();
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Return to the previous location
    pub fn back(&mut self) {
        if let Some(previous) = self.history.pop() {
            self.location = previous;
            self.status_message = None;
            self.settle();
        }
    }

    /// Follow gate redirects (replacing the location) and prepare the
    /// landing page. Does nothing while the session is resolving.
    fn settle(&mut self) {
        for _ in 0..MAX_REDIRECTS {
            match self.decision() {
                GateDecision::Redirect(target) => {
                    debug!(from = %self.location, to = target, "Redirecting");
                    self.location = target.to_string();
                }
                GateDecision::Render(route) => {
                    self.prepare_page(route.page);
                    return;
                }
                GateDecision::Placeholder | GateDecision::NotFound(_) => return,
            }
        }
        error!(location = %self.location, "Redirect loop, returning home");
        self.location = HOME_PATH.to_string();
    }

    fn prepare_page(&mut self, page: Page) {
        match page {
            Page::Login => self.login_form.focus_first_empty(),
            Page::Profile => {
                if let Some(user) = self.session.user() {
                    self.profile_form = forms::profile_form(user);
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Account actions
    // =========================================================================

    /// Submit the login form. Errors are shown inline on the form.
    pub async fn attempt_login(&mut self) -> bool {
        let (email, password) = match forms::login_credentials(&self.login_form) {
            Ok(credentials) => credentials,
            Err(message) => {
                self.login_form.error = Some(message);
                return false;
            }
        };
        self.login_form.error = None;

        match self.api.login(&email, &password).await {
            Ok(response) => {
                self.login_form.clear_secrets();
                info!("Login successful");
                self.complete_sign_in(response);
                true
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_form.error = Some(e.user_message());
                false
            }
        }
    }

    /// Submit the sign-up form. Errors are shown inline on the form.
    pub async fn attempt_register(&mut self) -> bool {
        let request = match forms::registration_request(&self.register_form) {
            Ok(request) => request,
            Err(message) => {
                self.register_form.error = Some(message);
                return false;
            }
        };
        self.register_form.error = None;

        match self.api.register(&request).await {
            Ok(response) => {
                self.register_form.reset();
                info!("Registration successful");
                self.complete_sign_in(response);
                true
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.register_form.error = Some(e.user_message());
                false
            }
        }
    }

    /// Submit the changed profile fields
    pub async fn save_profile(&mut self) -> bool {
        let (Some(api), Some(user)) = (self.authed_api(), self.session.user()) else {
            return false;
        };

        let update = match forms::profile_update(&self.profile_form, user) {
            Ok(update) => update,
            Err(message) => {
                self.profile_form.error = Some(message);
                return false;
            }
        };
        if update.is_empty() {
            self.profile_form.error = None;
            self.status_message = Some("No changes to save".to_string());
            return false;
        }

        match api.update_profile(&update).await {
            Ok(user) => {
                info!("Profile updated");
                self.profile_form = forms::profile_form(&user);
                self.session.update_user(user);
                self.status_message = Some("Profile saved".to_string());
                true
            }
            Err(AuthError::Unauthorized) => {
                warn!("Token rejected while saving profile");
                self.session_expired();
                false
            }
            Err(e) => {
                error!(error = %e, "Profile update failed");
                self.profile_form.error = Some(e.user_message());
                false
            }
        }
    }

    /// Re-fetch the signed-in user's profile
    pub async fn refresh_profile(&mut self) {
        let Some(api) = self.authed_api() else {
            return;
        };

        self.status_message = Some("Refreshing profile...".to_string());
        match api.get_profile().await {
            Ok(user) => {
                self.session.update_user(user);
                self.status_message = Some("Profile refreshed".to_string());
            }
            Err(AuthError::Unauthorized) => self.session_expired(),
            Err(e) => {
                warn!(error = %e, "Profile refresh failed");
                self.status_message = Some(e.user_message());
            }
        }
    }

    pub fn logout(&mut self) {
        if self.session.user().is_none() {
            return;
        }
        self.session.sign_out();
        self.forget_token();
        self.login_form.error = None;
        self.status_message = Some("Logged out".to_string());
        self.settle();
    }

    // =========================================================================
    // Path prompt
    // =========================================================================

    pub fn start_path_entry(&mut self) {
        self.path_input = self.location.clone();
        self.state = AppState::EnteringPath;
    }

    pub fn push_path_char(&mut self, c: char) {
        if forms::can_add_char(self.path_input.chars().count(), MAX_PATH_LENGTH, c) {
            self.path_input.push(c);
        }
    }

    pub fn submit_path(&mut self) {
        self.state = AppState::Normal;
        let path = std::mem::take(&mut self.path_input);
        let path = path.trim();
        if !path.is_empty() {
            self.navigate(path);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
