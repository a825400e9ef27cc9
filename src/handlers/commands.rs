//! Command definitions
//!
//! Commands carry already-validated input into the handlers.

use serde::{Deserialize, Serialize};

/// Command to register a new user
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub name: String,
    /// Normalized email
    pub email: String,
    pub password: String,
}

impl RegisterUserCommand {
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Command to exchange credentials for a token
#[derive(Debug, Clone)]
pub struct LoginCommand {
    /// Normalized email
    pub email: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: String, password: String) -> Self {
        Self { email, password }
    }
}

/// Result of a successful registration or login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResult {
    pub token: String,
}
