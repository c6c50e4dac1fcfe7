//! Data models for user storage

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A user account as stored
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique, stored lowercase
    pub email: String,
    pub password_hash: String,
    pub is_email_verified: bool,
    /// Hash of the most recently issued refresh token; None when the user
    /// has no active session
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Projection with credential material stripped, used at every
    /// boundary that returns a user record.
    pub fn to_safe_view(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            is_email_verified: self.is_email_verified,
        }
    }
}

/// Registration data for a new account
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    /// Reject registrations with blank fields.
    ///
    /// Format rules (email shape, password strength) belong to the host
    /// application's input layer; this only guards the fields the store
    /// cannot function without.
    pub fn require_fields(&self) -> Result<(), AuthError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::Validation(format!("{field} is required")));
            }
        }
        Ok(())
    }
}

/// A user record without password or refresh-hash fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(rename = "isEmailVerified")]
    pub is_email_verified: bool,
}

/// Partial update applied through [`super::UserStore::update`].
///
/// `refresh_token_hash` is doubly optional: `None` leaves the column
/// untouched, `Some(None)` clears it (the explicit null that terminates
/// a session).
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub is_email_verified: Option<bool>,
    pub refresh_token_hash: Option<Option<String>>,
}
