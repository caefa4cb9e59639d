use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `AuthenticatedUser` struct represents the identity established by a
/// completed code exchange or silent renewal.
///
/// Profile claims are kept opaque: they come from the ID token payload
/// and, when enabled, the userinfo endpoint, and the engine never
/// interprets them beyond display purposes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is expired.
    pub expires_at: i64,
    pub profile: HashMap<String, Value>,
}

impl AuthenticatedUser {
    /// Construct a new user with optional refresh/ID tokens and profile claims.
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        id_token: Option<String>,
        expires_at: i64,
        profile: Option<HashMap<String, Value>>,
    ) -> Self {
        AuthenticatedUser {
            access_token,
            refresh_token,
            id_token,
            expires_at,
            profile: profile.unwrap_or_default(),
        }
    }

    /// Whether the access token has passed its expiry instant. An expired
    /// user is kept around (marked, not deleted) so callers can still
    /// read its identity while a renewal is pending.
    pub fn expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at
    }

    /// A display name taken from the usual profile claims, falling back
    /// to the subject.
    pub fn display_name(&self) -> Option<&str> {
        ["preferred_username", "name", "sub"]
            .iter()
            .find_map(|claim| self.profile.get(*claim).and_then(|value| value.as_str()))
    }
}
