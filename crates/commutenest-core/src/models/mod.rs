//! Data models for the housing service's account endpoints.
//!
//! - `User`: identity plus commute, budget and area preferences
//! - `ProfileUpdate`: partial update of the preference fields
//! - Request bodies for login, registration and Google OAuth exchange
//! - `AuthResponse`: user and access token returned on sign-in

pub mod user;

pub use user::{
    AuthResponse, GoogleOAuthRequest, LoginRequest, ProfileUpdate, RegisterRequest, User,
    WorkLocation,
};
