//! PostgreSQL account store

use axum::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::{AccountStore, StoreError};
use crate::models::{Account, NewAccount};

/// Account store backed by the `account` table
#[derive(Clone)]
pub struct PgAccountStore {
    db_pool: PgPool,
}

impl PgAccountStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Open a pool against `database_url`. `masked_url` is what gets logged.
    pub async fn connect(
        database_url: &str,
        masked_url: &str,
        max_connections: u32,
    ) -> Result<Self, StoreError> {
        tracing::info!(database = masked_url, max_connections, "Connecting to account database");

        let db_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("connection failed: {}", e)))?;

        Ok(Self::new(db_pool))
    }

    /// Bring the `account` table up to the latest schema in `./migrations`
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .map_err(|e| StoreError::Database(format!("migration failed: {}", e)))?;

        tracing::info!("Account schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let created: Account = sqlx::query_as(
            r#"
            INSERT INTO account (first_name, last_name, number, password_hash, balance, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING id, first_name, last_name, number, password_hash, balance, created_at
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.number)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let accounts: Vec<Account> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, number, password_hash, balance, created_at
            FROM account
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(accounts)
    }

    async fn find_by_number(&self, number: i64) -> Result<Account, StoreError> {
        sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, number, password_hash, balance, created_at
            FROM account
            WHERE number = $1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: i32) -> Result<Account, StoreError> {
        sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, number, password_hash, balance, created_at
            FROM account
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let rows_affected = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}
