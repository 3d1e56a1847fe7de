//! Account persistence
//!
//! `AccountStore` is the seam between services and storage. The Postgres
//! implementation backs the running server; the in-memory one backs tests and
//! local experiments.

use axum::async_trait;
use thiserror::Error;

use crate::models::{Account, NewAccount};

mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Account not found")]
    NotFound,

    #[error("Account number already in use")]
    DuplicateNumber,

    #[error("Database error: {0}")]
    Database(String),
}

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::DuplicateNumber
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Account storage operations. Implementations must be safe to share across
/// concurrent request handlers.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Look up by public account number
    async fn find_by_number(&self, number: i64) -> Result<Account, StoreError>;

    /// Look up by storage row id
    async fn find_by_id(&self, id: i32) -> Result<Account, StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// Cheap connectivity probe for health checks
    async fn ping(&self) -> Result<(), StoreError>;
}
