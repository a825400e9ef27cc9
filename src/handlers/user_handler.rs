//! User Registration Handler
//!
//! Creates a user with a hashed password and signs a token for it.

use std::sync::Arc;

use crate::auth::{hash_password, TokenService};
use crate::domain::User;
use crate::error::{AppError, AppResult};
use crate::store::Store;

use super::{RegisterUserCommand, TokenResult};

const USER_EXISTS_MSG: &str = "User already exists";

/// Handler for user registration
pub struct RegisterUserHandler {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl RegisterUserHandler {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Execute the register user command
    pub async fn execute(&self, command: RegisterUserCommand) -> AppResult<TokenResult> {
        if self.store.find_user_by_email(&command.email).await?.is_some() {
            return Err(AppError::InvalidRequest(USER_EXISTS_MSG.to_string()));
        }

        // Argon2 is CPU bound
        let password = command.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let user = User::new(command.name, command.email, password_hash);

        match self.store.insert_user(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration
            Err(e) if e.is_duplicate_email() => {
                return Err(AppError::InvalidRequest(USER_EXISTS_MSG.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "User registered");

        let token = self.tokens.issue(user.id)?;
        Ok(TokenResult { token })
    }
}
