//! Core library for the CommuteNest housing search client.
//!
//! - `api`: HTTP client for the housing service's account endpoints
//! - `auth`: session resolution and the stored access token
//! - `router`: route table and the session gate
//! - `models`: user and request/response types
//! - `config`: on-disk and environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;

pub use api::{AuthApi, AuthClient, AuthError, AuthResult};
pub use auth::{Session, SessionProvider, SessionState, StoredToken, TokenStore};
pub use config::Config;
pub use models::{AuthResponse, ProfileUpdate, RegisterRequest, User};
pub use router::{Access, Gate, GateDecision, Page, RouteMatch};
