//! Core user domain types.

use std::fmt::Display;

use serde::Serialize;
use uuid::Uuid;

use crate::user::PasswordHash;

/// A newtype wrapper for user IDs.
///
/// This helps disambiguate user IDs from the IDs of categories and
/// transactions, which are also UUIDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Hash)]
pub struct UserID(Uuid);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random user ID.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Serializes to the shape returned by the API, which never includes the
/// password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's ID in the application database.
    #[serde(rename = "userId")]
    pub id: UserID,
    /// The user's email address in lower case.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// The user's password hash.
    #[serde(skip)]
    pub password_hash: PasswordHash,
}

/// The data for a user that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
}

/// Emails are compared without regard to letter case or surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
