//! Data models for the account API

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::Validate;

pub mod auth;
pub use auth::*;

/// Account row as stored in the `account` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Storage row id
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Public account number, unique and immutable
    pub number: i64,
    pub password_hash: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Account response (sanitized for API)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// Insert payload for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request to open a new account
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 50, message = "first_name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "last_name must be 1-50 characters"))]
    pub last_name: String,
    /// bcrypt only uses the first 72 bytes
    #[validate(length(min = 8, max = 72, message = "password must be 8-72 characters"))]
    pub password: String,
}

/// Response to a successful delete
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteAccountResponse {
    pub deleted: i32,
}

/// Fund transfer envelope. Echoed back; no balance is moved.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}

/// Generic JSON error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
