//! Session resolution and ownership.
//!
//! `SessionProvider` is the single owner of the signed-in identity. It starts
//! out `Resolving`, leaves that state exactly once when startup resolution
//! finishes, and afterwards only changes through explicit sign-in, profile
//! refresh or sign-out.

use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::models::{AuthResponse, User};

use super::StoredToken;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup identity resolution is still in flight
    Resolving,
    Authenticated(User),
    Anonymous,
}

/// Snapshot of the session used to gate navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Session<'a> {
    pub user: Option<&'a User>,
    pub loading: bool,
}

impl<'a> Session<'a> {
    pub fn resolving() -> Self {
        Self { user: None, loading: true }
    }

    pub fn anonymous() -> Self {
        Self { user: None, loading: false }
    }

    pub fn authenticated(user: &'a User) -> Self {
        Self { user: Some(user), loading: false }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}

/// Outcome of startup identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Authenticated { user: User, token: String },
    Anonymous,
}

/// Resolve the identity behind a stored token.
///
/// Never fails: a missing or expired token, a rejected token, a network
/// error or a timeout all resolve to `Anonymous`. No retry is attempted.
pub async fn resolve_identity<A: AuthApi>(api: &A, stored: Option<StoredToken>) -> Resolution {
    let Some(stored) = stored else {
        debug!("No stored token, session is anonymous");
        return Resolution::Anonymous;
    };

    if stored.is_expired() {
        debug!(email = %stored.email, "Stored token expired, session is anonymous");
        return Resolution::Anonymous;
    }

    let authed = api.with_token(stored.access_token.clone());
    match authed.get_profile().await {
        Ok(user) => {
            info!(user_id = %user.id, "Session resolved");
            Resolution::Authenticated {
                user,
                token: stored.access_token,
            }
        }
        Err(e) => {
            warn!(error = %e, "Session resolution failed, continuing anonymously");
            Resolution::Anonymous
        }
    }
}

/// Owner of the current session state and its access token.
#[derive(Debug)]
pub struct SessionProvider {
    state: SessionState,
    token: Option<String>,
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider {
    pub fn new() -> Self {
        Self {
            state: SessionState::Resolving,
            token: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Session<'_> {
        match self.state {
            SessionState::Resolving => Session::resolving(),
            SessionState::Authenticated(ref user) => Session::authenticated(user),
            SessionState::Anonymous => Session::anonymous(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self.state {
            SessionState::Authenticated(ref user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Resolving)
    }

    /// Bearer token of the signed-in user
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Apply the result of startup resolution.
    ///
    /// Only the first call while `Resolving` has an effect; later results
    /// (including ones arriving after an explicit sign-in) are dropped.
    pub fn finish_resolution(&mut self, resolution: Resolution) -> bool {
        if !self.is_loading() {
            debug!("Ignoring late session resolution");
            return false;
        }

        match resolution {
            Resolution::Authenticated { user, token } => {
                self.token = Some(token);
                self.state = SessionState::Authenticated(user);
            }
            Resolution::Anonymous => {
                self.token = None;
                self.state = SessionState::Anonymous;
            }
        }
        true
    }

    /// Resolve the session in place. See [`resolve_identity`].
    pub async fn resolve<A: AuthApi>(&mut self, api: &A, stored: Option<StoredToken>) -> bool {
        let resolution = resolve_identity(api, stored).await;
        self.finish_resolution(resolution)
    }

    /// Adopt the user and token returned by login, registration or OAuth.
    pub fn sign_in(&mut self, response: AuthResponse) {
        info!(user_id = %response.user.id, "Signed in");
        self.token = Some(response.access_token);
        self.state = SessionState::Authenticated(response.user);
    }

    /// Replace the signed-in user with a fresher copy from the service.
    /// Returns false when nobody is signed in.
    pub fn update_user(&mut self, user: User) -> bool {
        match self.state {
            SessionState::Authenticated(ref mut current) => {
                *current = user;
                true
            }
            _ => false,
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user() {
            info!(user_id = %user.id, "Signed out");
        }
        self.token = None;
        self.state = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::api::{AuthError, AuthResult};
    use crate::models::user::sample_user;
    use crate::models::{ProfileUpdate, RegisterRequest};

    #[derive(Clone, Copy)]
    enum Outcome {
        Profile,
        Rejected,
        Down,
    }

    /// Boundary that answers profile fetches from a fixed outcome.
    #[derive(Clone)]
    struct FakeApi {
        outcome: Outcome,
        token: Option<String>,
        profile_calls: Arc<AtomicUsize>,
    }

    impl FakeApi {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                token: None,
                profile_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.profile_calls.load(Ordering::SeqCst)
        }
    }

    impl AuthApi for FakeApi {
        fn with_token(&self, token: String) -> Self {
            Self {
                token: Some(token),
                ..self.clone()
            }
        }

        async fn login(&self, _email: &str, _password: &str) -> AuthResult<AuthResponse> {
            Err(AuthError::InvalidCredentials("Invalid email or password".into()))
        }

        async fn register(&self, _request: &RegisterRequest) -> AuthResult<AuthResponse> {
            Err(AuthError::Validation("unused".into()))
        }

        async fn get_profile(&self) -> AuthResult<User> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if self.token.as_deref() != Some("tok") {
                return Err(AuthError::Unauthorized);
            }
            match self.outcome {
                Outcome::Profile => Ok(sample_user()),
                Outcome::Rejected => Err(AuthError::Unauthorized),
                Outcome::Down => Err(AuthError::Server("upstream unavailable".into())),
            }
        }

        async fn update_profile(&self, _update: &ProfileUpdate) -> AuthResult<User> {
            Err(AuthError::Unauthorized)
        }

        async fn google_oauth(
            &self,
            _token: &str,
            _email: &str,
            _name: &str,
            _google_id: &str,
        ) -> AuthResult<AuthResponse> {
            Err(AuthError::InvalidCredentials("unused".into()))
        }
    }

    fn stored(minutes_ago: i64) -> Option<StoredToken> {
        Some(StoredToken {
            access_token: "tok".to_string(),
            email: "dana@example.com".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        })
    }

    #[test]
    fn test_new_provider_is_loading() {
        let provider = SessionProvider::new();
        assert_eq!(provider.session(), Session::resolving());
        assert!(provider.user().is_none());
        assert!(provider.token().is_none());
    }

    #[tokio::test]
    async fn test_no_token_resolves_anonymous_without_network() {
        let api = FakeApi::new(Outcome::Profile);
        let mut provider = SessionProvider::new();

        assert!(provider.resolve(&api, None).await);
        assert_eq!(provider.session(), Session::anonymous());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_resolves_anonymous_without_network() {
        let api = FakeApi::new(Outcome::Profile);
        let mut provider = SessionProvider::new();

        provider.resolve(&api, stored(60)).await;
        assert_eq!(provider.state(), &SessionState::Anonymous);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let api = FakeApi::new(Outcome::Profile);
        let mut provider = SessionProvider::new();

        provider.resolve(&api, stored(1)).await;
        let session = provider.session();
        assert!(!session.loading);
        assert_eq!(session.user, Some(&sample_user()));
        assert_eq!(provider.token(), Some("tok"));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_resolution_failures_degrade_to_anonymous() {
        for outcome in [Outcome::Rejected, Outcome::Down] {
            let api = FakeApi::new(outcome);
            let mut provider = SessionProvider::new();

            assert!(provider.resolve(&api, stored(1)).await);
            assert_eq!(provider.session(), Session::anonymous());
            assert!(provider.token().is_none());
            assert_eq!(api.calls(), 1, "no retry expected");
        }
    }

    #[test]
    fn test_loading_ends_exactly_once() {
        let mut provider = SessionProvider::new();
        assert!(provider.finish_resolution(Resolution::Anonymous));
        assert!(!provider.finish_resolution(Resolution::Authenticated {
            user: sample_user(),
            token: "tok".into(),
        }));
        assert_eq!(provider.session(), Session::anonymous());
    }

    #[test]
    fn test_late_resolution_does_not_override_sign_in() {
        let mut provider = SessionProvider::new();
        let mut user = sample_user();
        user.username = "fresh".into();
        provider.sign_in(AuthResponse {
            user: user.clone(),
            access_token: "new".into(),
        });

        assert!(!provider.finish_resolution(Resolution::Anonymous));
        assert_eq!(provider.user(), Some(&user));
        assert_eq!(provider.token(), Some("new"));
    }

    #[test]
    fn test_update_user_requires_sign_in() {
        let mut provider = SessionProvider::new();
        provider.finish_resolution(Resolution::Anonymous);
        assert!(!provider.update_user(sample_user()));

        provider.sign_in(AuthResponse {
            user: sample_user(),
            access_token: "tok".into(),
        });
        let mut changed = sample_user();
        changed.max_commute_time = Some(10);
        assert!(provider.update_user(changed.clone()));
        assert_eq!(provider.user(), Some(&changed));
    }

    #[test]
    fn test_sign_out() {
        let mut provider = SessionProvider::new();
        provider.sign_in(AuthResponse {
            user: sample_user(),
            access_token: "tok".into(),
        });
        provider.sign_out();
        assert_eq!(provider.session(), Session::anonymous());
        assert!(provider.token().is_none());
    }
}
