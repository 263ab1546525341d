//! Authentication module for resolving and owning the user's session.
//!
//! This module provides:
//! - `SessionProvider`: the `Resolving -> Authenticated | Anonymous` session state machine
//! - `TokenStore`: the access token persisted between runs
//!
//! Stored tokens expire after 15 minutes, matching the service's JWT lifetime.

pub mod session;
pub mod token_store;

pub use session::{resolve_identity, Resolution, Session, SessionProvider, SessionState};
pub use token_store::{StoredToken, TokenStore};
