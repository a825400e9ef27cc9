//! User entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stored user record. Never serialized directly: it carries the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Normalized (trimmed, lower-case) login identifier
    pub email: String,
    pub password_hash: String,
    pub date: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            date: Utc::now(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            date: self.date,
        }
    }
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}
