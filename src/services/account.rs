//! Account lifecycle service
//!
//! Creation (hashing + number assignment), listing, lookup and deletion.

use chrono::Utc;
use rand::Rng;
use std::ops::Range;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{hash_password, PasswordError};
use crate::models::{Account, CreateAccountRequest, NewAccount};
use crate::store::{AccountStore, StoreError};

/// Range account numbers are drawn from
pub const ACCOUNT_NUMBER_RANGE: Range<i64> = 100_000..1_000_000_000;

/// Attempts at finding an unused account number before giving up
const MAX_NUMBER_ATTEMPTS: usize = 5;

type NumberGenerator = Box<dyn Fn() -> i64 + Send + Sync>;

/// Account service errors
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("No free account number after {0} attempts")]
    NumberExhausted(usize),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Account service
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    bcrypt_cost: u32,
    next_number: NumberGenerator,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, bcrypt_cost: u32) -> Self {
        Self::with_number_generator(
            store,
            bcrypt_cost,
            Box::new(|| rand::thread_rng().gen_range(ACCOUNT_NUMBER_RANGE)),
        )
    }

    pub fn with_number_generator(
        store: Arc<dyn AccountStore>,
        bcrypt_cost: u32,
        next_number: NumberGenerator,
    ) -> Self {
        Self {
            store,
            bcrypt_cost,
            next_number,
        }
    }

    /// Open an account. The password is hashed before anything is stored.
    pub async fn create_account(&self, req: CreateAccountRequest) -> Result<Account, AccountError> {
        let cost = self.bcrypt_cost;
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))??;

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let new_account = NewAccount {
                first_name: req.first_name.clone(),
                last_name: req.last_name.clone(),
                number: (self.next_number)(),
                password_hash: password_hash.clone(),
                created_at: Utc::now(),
            };

            match self.store.create(new_account).await {
                Ok(account) => {
                    tracing::info!(
                        account_id = account.id,
                        account_number = account.number,
                        "Account created"
                    );
                    return Ok(account);
                }
                Err(StoreError::DuplicateNumber) => {
                    tracing::warn!(attempt, "Account number collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AccountError::NumberExhausted(MAX_NUMBER_ATTEMPTS))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.store.list().await?)
    }

    pub async fn get_account(&self, id: i32) -> Result<Account, AccountError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn delete_account(&self, id: i32) -> Result<(), AccountError> {
        self.store.delete(id).await?;
        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::store::MemoryAccountStore;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn request() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = AccountService::new(store, 4);

        let account = service.create_account(request()).await.unwrap();

        assert!(ACCOUNT_NUMBER_RANGE.contains(&account.number));
        assert_eq!(account.balance, 0);
        assert_ne!(account.password_hash, "secret123");
        assert!(verify_password("secret123", &account.password_hash));
    }

    #[tokio::test]
    async fn test_number_collision_retries() {
        let store = Arc::new(MemoryAccountStore::new());
        // Yields 500_000, 500_000, 500_001, ...
        let counter = Arc::new(AtomicI64::new(0));
        let service = AccountService::with_number_generator(
            store,
            4,
            Box::new(move || 500_000 + (counter.fetch_add(1, Ordering::SeqCst) - 1).max(0)),
        );

        let first = service.create_account(request()).await.unwrap();
        let second = service.create_account(request()).await.unwrap();

        assert_eq!(first.number, 500_000);
        assert_eq!(second.number, 500_001);
    }

    #[tokio::test]
    async fn test_number_exhaustion() {
        let store = Arc::new(MemoryAccountStore::new());
        let service =
            AccountService::with_number_generator(store, 4, Box::new(|| 777_777));

        service.create_account(request()).await.unwrap();
        assert!(matches!(
            service.create_account(request()).await,
            Err(AccountError::NumberExhausted(MAX_NUMBER_ATTEMPTS))
        ));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let store = Arc::new(MemoryAccountStore::new());
        let service = AccountService::new(store, 4);
        let account = service.create_account(request()).await.unwrap();

        assert_eq!(
            service.get_account(account.id).await.unwrap().number,
            account.number
        );
        service.delete_account(account.id).await.unwrap();
        assert!(matches!(
            service.get_account(account.id).await,
            Err(AccountError::Store(StoreError::NotFound))
        ));
        assert!(service.list_accounts().await.unwrap().is_empty());
    }
}
