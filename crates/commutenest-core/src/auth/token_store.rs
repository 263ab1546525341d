use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::AuthResponse;

/// Token file name in cache directory
const TOKEN_FILE: &str = "session.json";

/// Access token lifetime in minutes.
/// The housing service issues JWT access tokens valid for 15 minutes.
const TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Access token kept between application runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn from_response(response: &AuthResponse) -> Self {
        Self {
            access_token: response.access_token.clone(),
            email: response.user.email.clone(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES);
        Utc::now() > expiry
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        let expiry = self.created_at + Duration::minutes(TOKEN_EXPIRY_MINUTES);
        (expiry - Utc::now()).num_minutes().max(0)
    }
}

/// On-disk storage for the access token.
pub struct TokenStore {
    cache_dir: PathBuf,
}

impl TokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Load the stored token. Expired tokens are treated as absent.
    pub fn load(&self) -> Result<Option<StoredToken>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let token: StoredToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;

        if token.is_expired() {
            Ok(None)
        } else {
            Ok(Some(token))
        }
    }

    /// Save token to disk
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(token)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        Ok(())
    }

    /// Remove the stored token, if any
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(created_at: DateTime<Utc>) -> StoredToken {
        StoredToken {
            access_token: "tok".to_string(),
            email: "dana@example.com".to_string(),
            created_at,
        }
    }

    #[test]
    fn test_token_expiry() {
        assert!(!token(Utc::now()).is_expired());
        assert!(token(Utc::now() - Duration::minutes(16)).is_expired());
        assert_eq!(token(Utc::now() - Duration::minutes(20)).minutes_until_expiry(), 0);
    }

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested"));

        assert_eq!(store.load().unwrap(), None);

        let saved = token(Utc::now());
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), Some(saved));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_expired_token_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        store.save(&token(Utc::now() - Duration::hours(2))).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_token_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKEN_FILE), "not json").unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        assert!(store.load().is_err());
    }
}
