//! Login and current-user handlers

use std::sync::Arc;

use crate::auth::{verify_against_decoy, verify_password, TokenService};
use crate::domain::{OperationContext, UserProfile};
use crate::error::{AppError, AppResult};
use crate::store::Store;

use super::{LoginCommand, TokenResult};

const INVALID_CREDENTIALS_MSG: &str = "Invalid Credentials";

/// Handler for credential login
pub struct LoginHandler {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl LoginHandler {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Verify credentials and sign a token. Unknown email and wrong password
    /// produce the same error after the same amount of hashing work.
    pub async fn execute(&self, command: LoginCommand) -> AppResult<TokenResult> {
        let user = self.store.find_user_by_email(&command.email).await?;

        let password = command.password;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => verify_password(&password, &hash),
            None => {
                verify_against_decoy(&password);
                Ok(false)
            }
        })
        .await
        .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))??;

        let user = match user {
            Some(user) if matches => user,
            Some(user) => {
                tracing::info!(user_id = %user.id, "Login rejected: wrong password");
                return Err(invalid_credentials());
            }
            None => return Err(invalid_credentials()),
        };

        let token = self.tokens.issue(user.id)?;
        Ok(TokenResult { token })
    }
}

fn invalid_credentials() -> AppError {
    AppError::InvalidRequest(INVALID_CREDENTIALS_MSG.to_string())
}

/// Handler returning the acting user's profile
pub struct CurrentUserHandler {
    store: Arc<dyn Store>,
}

impl CurrentUserHandler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, context: &OperationContext) -> AppResult<UserProfile> {
        let user = self
            .store
            .find_user_by_id(context.user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        Ok(user.profile())
    }
}
