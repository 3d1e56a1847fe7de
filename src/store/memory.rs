//! In-memory account store

use axum::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{AccountStore, StoreError};
use crate::models::{Account, NewAccount};

#[derive(Default)]
struct Inner {
    next_id: i32,
    accounts: Vec<Account>,
}

/// Account store held in process memory. Row ids are assigned sequentially
/// starting at 1, mirroring a serial column.
#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.accounts.iter().any(|a| a.number == account.number) {
            return Err(StoreError::DuplicateNumber);
        }

        inner.next_id += 1;
        let created = Account {
            id: inner.next_id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            password_hash: account.password_hash,
            balance: 0,
            created_at: account.created_at,
        };
        inner.accounts.push(created.clone());

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.inner.read().await.accounts.clone())
    }

    async fn find_by_number(&self, number: i64) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.number == number)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: i32) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.accounts.len();
        inner.accounts.retain(|a| a.id != id);

        if inner.accounts.len() == before {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
