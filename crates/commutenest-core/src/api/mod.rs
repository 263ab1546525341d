//! HTTP client module for the housing service's account endpoints.
//!
//! This module provides the `AuthClient` for signing in, registering,
//! exchanging Google OAuth tokens and reading or updating the user profile.
//!
//! Authenticated calls use a JWT bearer token returned by the sign-in
//! endpoints.

pub mod auth_api;
pub mod client;
pub mod error;

pub use auth_api::AuthApi;
pub use client::AuthClient;
pub use error::{AuthError, AuthResult};
