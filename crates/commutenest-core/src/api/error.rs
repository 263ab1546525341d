use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized - token missing or expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error bodies sent by the housing service. Route handlers answer
/// `{"error": "..."}`; the JWT layer answers `{"msg": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    msg: Option<String>,
}

impl ErrorBody {
    fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|parsed| parsed.error.is_some() || parsed.msg.is_some())
    }
}

impl AuthError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Pull the service's message out of an error body, falling back to the raw text.
    fn message_from_body(body: &str) -> String {
        match ErrorBody::parse(body).and_then(|parsed| parsed.error.or(parsed.msg)) {
            Some(message) => Self::truncate_body(&message),
            None => Self::truncate_body(body.trim()),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::message_from_body(body);
        match status.as_u16() {
            400 | 409 | 422 => AuthError::Validation(message),
            401 | 403 => AuthError::Unauthorized,
            404 => AuthError::NotFound(message),
            500..=599 => AuthError::Server(message),
            _ => AuthError::InvalidResponse(format!("Status {}: {}", status, message)),
        }
    }

    /// Reinterpret a rejection of a sign-in request. A 401 there means the
    /// submitted credentials were wrong, not that a session expired.
    pub(crate) fn credentials_rejected(self, status: reqwest::StatusCode, body: &str) -> Self {
        match self {
            AuthError::Unauthorized => {
                let message = Self::message_from_body(body);
                if message.is_empty() {
                    AuthError::InvalidCredentials(status.to_string())
                } else {
                    AuthError::InvalidCredentials(message)
                }
            }
            other => other,
        }
    }

    /// Reinterpret a rejection of a token-authenticated request. The JWT
    /// layer answers 422 with a `msg` body for malformed or forged tokens,
    /// which means the session is gone just like a 401.
    pub(crate) fn session_rejected(self, status: reqwest::StatusCode, body: &str) -> Self {
        let jwt_rejection = status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            && ErrorBody::parse(body).is_some_and(|parsed| parsed.msg.is_some());
        if jwt_rejection {
            AuthError::Unauthorized
        } else {
            self
        }
    }

    /// True for errors caused by the transport rather than the service
    pub fn is_network(&self) -> bool {
        matches!(self, AuthError::NetworkFailure(_))
    }

    /// Short message suitable for showing inline on a form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(msg) if !msg.is_empty() => msg.clone(),
            AuthError::InvalidCredentials(_) => "Invalid email or password".to_string(),
            AuthError::Validation(msg) => msg.clone(),
            AuthError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            AuthError::NotFound(_) => "Account not found".to_string(),
            AuthError::Server(_) => "The housing service had a problem. Please try again.".to_string(),
            AuthError::NetworkFailure(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            AuthError::NetworkFailure(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            AuthError::InvalidResponse(_) => "Unexpected response from server".to_string(),
        }
    }
}
