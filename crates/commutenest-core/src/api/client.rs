//! API client for the housing service's `/auth` endpoints.
//!
//! Every call is a single request/response round trip. There is no retry
//! and no caching; errors are returned to the caller as `AuthError`.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{
    user::ProfileResponse, AuthResponse, GoogleOAuthRequest, LoginRequest, ProfileUpdate,
    RegisterRequest, User,
};

use super::{AuthApi, AuthError, AuthResult};

// ============================================================================
// Constants
// ============================================================================

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const PROFILE_PATH: &str = "/auth/profile";
const GOOGLE_OAUTH_PATH: &str = "/auth/oauth/google";

/// How a 401 from the service should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    /// Sign-in request: a 401 means the submitted credentials were wrong
    Credentials,
    /// Token-authenticated request: a 401 means the session is gone
    Session,
}

/// Client for the housing service's account endpoints.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl AuthClient {
    /// Create a new client for the service rooted at `base_url`
    /// (for example `http://localhost:5000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> AuthResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new AuthClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Create an anonymous copy of this client, sharing the connection pool.
    pub fn without_token(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> AuthResult<RequestBuilder> {
        match self.token {
            Some(ref token) => Ok(request.bearer_auth(token)),
            None => {
                debug!("No access token available");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Send a request and decode a successful JSON body.
    async fn execute<T: DeserializeOwned>(
        request: RequestBuilder,
        rejection: Rejection,
        what: &str,
    ) -> AuthResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, request = what, "Request rejected by housing service");
            let err = AuthError::from_status(status, &body);
            return Err(match rejection {
                Rejection::Credentials => err.credentials_rejected(status, &body),
                Rejection::Session => err.session_rejected(status, &body),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<AuthResponse> {
        debug!(email, "Logging in");
        let request = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest { email, password });

        Self::execute(request, Rejection::Credentials, "login").await
    }

    /// Create a new account and sign in to it
    pub async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse> {
        debug!(email = %request.email, username = %request.username, "Registering account");
        let request = self.client.post(self.url(REGISTER_PATH)).json(request);

        Self::execute(request, Rejection::Credentials, "register").await
    }

    /// Fetch the profile of the user the current token belongs to
    pub async fn get_profile(&self) -> AuthResult<User> {
        let request = self.authorized(self.client.get(self.url(PROFILE_PATH)))?;

        Self::execute(request, Rejection::Session, "profile").await
    }

    /// Update the fields set on `update`, leaving the rest untouched.
    /// Returns the user as stored by the service afterwards.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<User> {
        let request = self
            .authorized(self.client.put(self.url(PROFILE_PATH)))?
            .json(update);

        let response: ProfileResponse =
            Self::execute(request, Rejection::Session, "profile update").await?;
        Ok(response.user)
    }

    /// Exchange a Google sign-in token for a housing service session
    pub async fn google_oauth(
        &self,
        token: &str,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> AuthResult<AuthResponse> {
        debug!(email, "Exchanging Google OAuth token");
        let request = self
            .client
            .post(self.url(GOOGLE_OAUTH_PATH))
            .json(&GoogleOAuthRequest {
                token,
                email,
                name,
                google_id,
            });

        Self::execute(request, Rejection::Credentials, "google oauth").await
    }
}

impl AuthApi for AuthClient {
    fn with_token(&self, token: String) -> Self {
        AuthClient::with_token(self, token)
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<AuthResponse> {
        AuthClient::login(self, email, password).await
    }

    async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse> {
        AuthClient::register(self, request).await
    }

    async fn get_profile(&self) -> AuthResult<User> {
        AuthClient::get_profile(self).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<User> {
        AuthClient::update_profile(self, update).await
    }

    async fn google_oauth(
        &self,
        token: &str,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> AuthResult<AuthResponse> {
        AuthClient::google_oauth(self, token, email, name, google_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::models::user::sample_user;

    const TOKEN: &str = "tok-123";

    /// Shared state of the fake housing service
    #[derive(Default)]
    struct Boundary {
        last_update_body: Mutex<Option<Value>>,
        last_oauth_body: Mutex<Option<Value>>,
    }

    type Reply = (StatusCode, Json<Value>);

    fn signed_in() -> Reply {
        (
            StatusCode::OK,
            Json(json!({ "message": "ok", "access_token": TOKEN, "user": sample_user() })),
        )
    }

    fn error(status: StatusCode, message: &str) -> Reply {
        (status, Json(json!({ "error": message })))
    }

    fn has_token(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false)
    }

    async fn login(Json(body): Json<Value>) -> Reply {
        if body["email"] == "dana@example.com" && body["password"] == "password123" {
            signed_in()
        } else {
            error(StatusCode::UNAUTHORIZED, "Invalid email or password")
        }
    }

    async fn register(Json(body): Json<Value>) -> Reply {
        if body["email"] == "dana@example.com" {
            return error(StatusCode::CONFLICT, "Email already registered");
        }
        let mut user = sample_user();
        user.email = body["email"].as_str().unwrap_or_default().to_string();
        user.username = body["username"].as_str().unwrap_or_default().to_string();
        (
            StatusCode::CREATED,
            Json(json!({ "message": "created", "access_token": TOKEN, "user": user })),
        )
    }

    async fn profile(headers: HeaderMap) -> Reply {
        if !has_token(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "Missing Authorization Header" })));
        }
        (StatusCode::OK, Json(json!(sample_user())))
    }

    async fn update_profile(
        State(boundary): State<Arc<Boundary>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Reply {
        if headers.get("authorization").is_some_and(|v| v == "Bearer forged") {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "msg": "Signature verification failed" })),
            );
        }
        if !has_token(&headers) {
            return error(StatusCode::UNAUTHORIZED, "Token has expired");
        }
        *boundary.last_update_body.lock().unwrap() = Some(body.clone());
        let update: ProfileUpdate = serde_json::from_value(body).unwrap();
        let mut user = sample_user();
        user.apply(&update);
        (StatusCode::OK, Json(json!({ "message": "updated", "user": user })))
    }

    async fn google(State(boundary): State<Arc<Boundary>>, Json(body): Json<Value>) -> Reply {
        *boundary.last_oauth_body.lock().unwrap() = Some(body.clone());
        if body["token"] == "google-ok" {
            signed_in()
        } else {
            error(StatusCode::UNAUTHORIZED, "Google token rejected")
        }
    }

    async fn slow() -> Reply {
        tokio::time::sleep(Duration::from_secs(2)).await;
        signed_in()
    }

    /// Start the fake service on an ephemeral port and return its API base URL.
    async fn spawn_boundary() -> (String, Arc<Boundary>) {
        let boundary = Arc::new(Boundary::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/profile", get(profile).put(update_profile))
            .route("/api/auth/oauth/google", post(google))
            .route("/slow/auth/login", post(slow))
            .with_state(boundary.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/api", addr), boundary)
    }

    fn client(base_url: &str) -> AuthClient {
        AuthClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_login_success() {
        let (base, _) = spawn_boundary().await;
        let response = client(&base).login("dana@example.com", "password123").await.unwrap();
        assert_eq!(response.access_token, TOKEN);
        assert_eq!(response.user.username, "dana");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let (base, _) = spawn_boundary().await;
        let err = client(&base).login("a@b.com", "wrong").await.unwrap_err();
        assert!(
            matches!(err, AuthError::InvalidCredentials(ref msg) if msg == "Invalid email or password"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let (base, _) = spawn_boundary().await;
        let request = RegisterRequest {
            email: "dana@example.com".into(),
            username: "dana2".into(),
            password: "password123".into(),
            ..Default::default()
        };
        let err = client(&base).register(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref msg) if msg == "Email already registered"));
    }

    #[tokio::test]
    async fn test_register_success_accepts_created_status() {
        let (base, _) = spawn_boundary().await;
        let request = RegisterRequest {
            email: "new@example.com".into(),
            username: "newbie".into(),
            password: "password123".into(),
            first_name: Some("New".into()),
            last_name: None,
        };
        let response = client(&base).register(&request).await.unwrap();
        assert_eq!(response.user.email, "new@example.com");
        assert_eq!(response.user.username, "newbie");
    }

    #[tokio::test]
    async fn test_get_profile_without_token_is_unauthorized() {
        let (base, _) = spawn_boundary().await;
        let err = client(&base).get_profile().await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_get_profile_with_stale_token_is_unauthorized() {
        let (base, _) = spawn_boundary().await;
        let err = client(&base)
            .with_token("expired".to_string())
            .get_profile()
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_get_profile_with_token() {
        let (base, _) = spawn_boundary().await;
        let user = client(&base).with_token(TOKEN.to_string()).get_profile().await.unwrap();
        assert_eq!(user, sample_user());
    }

    #[tokio::test]
    async fn test_update_profile_sends_only_set_fields() {
        let (base, boundary) = spawn_boundary().await;
        let update = ProfileUpdate {
            budget_max: Some(3200),
            ..Default::default()
        };

        let user = client(&base)
            .with_token(TOKEN.to_string())
            .update_profile(&update)
            .await
            .unwrap();

        let sent = boundary.last_update_body.lock().unwrap().clone().unwrap();
        assert_eq!(sent, json!({ "budget_max": 3200 }));

        let mut expected = sample_user();
        expected.budget_max = Some(3200);
        assert_eq!(user, expected);
    }

    #[tokio::test]
    async fn test_update_profile_with_forged_token_is_unauthorized() {
        let (base, boundary) = spawn_boundary().await;
        let update = ProfileUpdate {
            budget_max: Some(3200),
            ..Default::default()
        };

        let err = client(&base)
            .with_token("forged".to_string())
            .update_profile(&update)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized), "unexpected error: {err:?}");
        assert!(!err.user_message().contains('{'));
        assert!(boundary.last_update_body.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_without_token_never_hits_the_wire() {
        let (base, boundary) = spawn_boundary().await;
        let err = client(&base)
            .update_profile(&ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        assert!(boundary.last_update_body.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_google_oauth_exchange() {
        let (base, boundary) = spawn_boundary().await;
        let response = client(&base)
            .google_oauth("google-ok", "dana@example.com", "Dana Reyes", "g-77")
            .await
            .unwrap();
        assert_eq!(response.access_token, TOKEN);

        let sent = boundary.last_oauth_body.lock().unwrap().clone().unwrap();
        assert_eq!(
            sent,
            json!({
                "token": "google-ok",
                "email": "dana@example.com",
                "name": "Dana Reyes",
                "google_id": "g-77"
            })
        );
    }

    #[tokio::test]
    async fn test_google_oauth_rejected_token() {
        let (base, _) = spawn_boundary().await;
        let err = client(&base)
            .google_oauth("forged", "dana@example.com", "Dana", "g-77")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/api", addr))
            .login("a@b.com", "pw")
            .await
            .unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_timeout_is_network_failure() {
        let (base, _) = spawn_boundary().await;
        let slow_base = base.replace("/api", "/slow");
        let client = AuthClient::new(&slow_base, Duration::from_millis(100)).unwrap();

        let err = client.login("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::NetworkFailure(ref e) if e.is_timeout()));
        assert_eq!(err.user_message(), "Connection timed out. Please try again.");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AuthClient::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url(LOGIN_PATH), "http://localhost:5000/api/auth/login");
        assert!(!client.has_token());
        assert!(client.with_token("t".into()).has_token());
        assert!(!client.with_token("t".into()).without_token().has_token());
    }
}
