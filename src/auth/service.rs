//! Authentication service
//!
//! Verifies account credentials and issues tokens.

use std::sync::Arc;
use thiserror::Error;

use crate::models::LoginResponse;
use crate::store::{AccountStore, StoreError};

use super::jwt::{TokenError, TokenService};
use super::password::verify_password;

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown account number or wrong password; deliberately not told apart
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(store: Arc<dyn AccountStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Check a number/password pair and issue a token on success
    pub async fn login(&self, number: i64, password: &str) -> Result<LoginResponse, AuthError> {
        let account = match self.store.find_by_number(number).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => {
                tracing::info!(account_number = number, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let password = password.to_owned();
        let password_hash = account.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        if !matches {
            tracing::info!(account_number = number, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(account.number)?;
        tracing::info!(
            account_number = account.number,
            expires_at = %issued.expires_at,
            "Login succeeded"
        );

        Ok(LoginResponse {
            token: issued.token,
            number: account.number,
        })
    }
}
