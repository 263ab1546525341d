//! The async seam between session handling and the housing service.
//!
//! `AuthClient` is the production implementation; tests substitute their
//! own boundary so session resolution can be exercised without a network.

use crate::models::{AuthResponse, ProfileUpdate, RegisterRequest, User};

use super::AuthResult;

/// Authentication and profile operations offered by the housing service.
#[trait_variant::make(AuthApi: Send)]
pub trait LocalAuthApi {
    /// A copy of this boundary that authenticates with `token`.
    fn with_token(&self, token: String) -> Self;

    async fn login(&self, email: &str, password: &str) -> AuthResult<AuthResponse>;

    async fn register(&self, request: &RegisterRequest) -> AuthResult<AuthResponse>;

    async fn get_profile(&self) -> AuthResult<User>;

    async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<User>;

    async fn google_oauth(
        &self,
        token: &str,
        email: &str,
        name: &str,
        google_id: &str,
    ) -> AuthResult<AuthResponse>;
}
