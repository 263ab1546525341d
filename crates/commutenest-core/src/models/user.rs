//! User identity and commute preference models.
//!
//! Field names match the housing service's JSON exactly (snake_case), so
//! these types deserialize straight from `/auth/*` responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A user account together with the search preferences attached to it.
///
/// Every preference is optional; `None` means "not set", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub work_address: Option<String>,
    #[serde(default)]
    pub work_lat: Option<f64>,
    #[serde(default)]
    pub work_lng: Option<f64>,
    /// Longest acceptable commute, in minutes
    #[serde(default)]
    pub max_commute_time: Option<u32>,
    #[serde(default)]
    pub budget_min: Option<u32>,
    #[serde(default)]
    pub budget_max: Option<u32>,
    #[serde(default)]
    pub preferred_areas: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Where the user works, as far as it has been filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkLocation<'a> {
    pub address: Option<&'a str>,
    pub coordinates: Option<(f64, f64)>,
}

impl User {
    /// Full name when known, falling back to the username.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            self.username.clone()
        } else {
            parts.join(" ")
        }
    }

    /// Work location, or `None` when neither address nor coordinates are set.
    /// Coordinates only count when both latitude and longitude are present.
    pub fn work_location(&self) -> Option<WorkLocation<'_>> {
        let address = self.work_address.as_deref().filter(|a| !a.trim().is_empty());
        let coordinates = self.work_lat.zip(self.work_lng);

        if address.is_none() && coordinates.is_none() {
            None
        } else {
            Some(WorkLocation { address, coordinates })
        }
    }

    /// Apply a partial update. Only the fields set on `update` change.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        set(&mut self.first_name, &update.first_name);
        set(&mut self.last_name, &update.last_name);
        set(&mut self.work_address, &update.work_address);
        set(&mut self.work_lat, &update.work_lat);
        set(&mut self.work_lng, &update.work_lng);
        set(&mut self.max_commute_time, &update.max_commute_time);
        set(&mut self.budget_min, &update.budget_min);
        set(&mut self.budget_max, &update.budget_max);
        set(&mut self.preferred_areas, &update.preferred_areas);
    }
}

/// Partial profile update sent to `PUT /auth/profile`.
///
/// Unset fields are left out of the request body entirely, so the server
/// only touches what was provided.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_commute_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_areas: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Body of `POST /auth/oauth/google`.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleOAuthRequest<'a> {
    pub token: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub google_id: &'a str,
}

/// Response of login, register and OAuth exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
}

/// Response wrapper of `PUT /auth/profile`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileResponse {
    pub user: User,
}

#[cfg(test)]
pub(crate) fn sample_user() -> User {
    User {
        id: "8f14e45f-ceea-467a-9575-f1a3c6b1d2e0".to_string(),
        email: "dana@example.com".to_string(),
        username: "dana".to_string(),
        first_name: Some("Dana".to_string()),
        last_name: Some("Reyes".to_string()),
        work_address: Some("500 Market St".to_string()),
        work_lat: Some(37.79),
        work_lng: Some(-122.40),
        max_commute_time: Some(35),
        budget_min: Some(1800),
        budget_max: Some(2600),
        preferred_areas: Some(vec!["Mission".to_string(), "Noe Valley".to_string()]),
        created_at: None,
        updated_at: None,
    }
}
