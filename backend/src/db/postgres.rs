//! PostgreSQL-backed account store.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::{Config as TokioConfig, NoTls};
use tracing::{error, info, warn};

use super::models::Account;
use super::queries;
use super::{AccountStore, StoreError};
use crate::models::TransferRequest;

const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");

/// Database connection wrapper.
///
/// This struct wraps the connection pool and provides
/// methods for common database operations.
///
/// ## Usage
///
/// ```rust,ignore
/// let pg: tokio_postgres::Config = "postgres://...".parse()?;
/// let db = Database::connect(&pg, 10, Duration::from_secs(5)).await?;
/// let account = queries::get_account_by_number(db.pool(), 482913).await?;
/// ```
#[derive(Clone)]
pub struct Database {
    /// The connection pool
    pool: Pool,
}

impl Database {
    /// Connect to the PostgreSQL database.
    ///
    /// Creates a connection pool of `max_size` connections. `timeout`
    /// bounds how long a caller waits for, creates or recycles a
    /// connection.
    ///
    /// ## Returns
    ///
    /// * `Ok(Database)` - Connected successfully
    /// * `Err(StoreError)` - Connection failed
    pub async fn connect(
        tokio_config: &TokioConfig,
        max_size: usize,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        info!("Connecting to database...");

        // Pass the parsed settings to deadpool unchanged
        let manager = Manager::from_config(
            tokio_config.clone(),
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(max_size)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StoreError::ConfigError(e.to_string()))?;

        // Test connection
        let client = pool
            .get()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        client
            .query("SELECT 1", &[])
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        info!("Database connection established (pool size {})", max_size);

        Ok(Self { pool })
    }

    /// Apply the schema.
    ///
    /// The script only uses `IF NOT EXISTS`, so running it on every
    /// start is safe.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations...");

        let client = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        match client.batch_execute(INITIAL_SCHEMA).await {
            Ok(()) => {
                info!("Migrations completed successfully");
                Ok(())
            }
            Err(e) => {
                let detail = e
                    .as_db_error()
                    .and_then(|db_err| db_err.detail())
                    .unwrap_or("No detail available");

                error!("Migration execution error: {}", e);
                error!("  Code: {:?}", e.code().map(|c| c.code()));
                error!("  Detail: {}", detail);

                Err(StoreError::MigrationError(e.to_string()))
            }
        }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

/// [`AccountStore`] over a PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresStore {
    db: Database,
}

impl PostgresStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn create_account(&self, account: &Account) -> Result<Account, StoreError> {
        queries::insert_account(self.db.pool(), account).await
    }

    async fn delete_account(&self, id: i32) -> Result<(), StoreError> {
        queries::delete_account(self.db.pool(), id).await
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        queries::update_account(self.db.pool(), account).await
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, StoreError> {
        queries::get_account_by_id(self.db.pool(), id).await
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        queries::get_account_by_number(self.db.pool(), number).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        queries::list_accounts(self.db.pool()).await
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<(), StoreError> {
        queries::transfer(self.db.pool(), request).await
    }

    async fn health_check(&self) -> bool {
        match self.db.pool().get().await {
            Ok(client) => client.query_one("SELECT 1", &[]).await.is_ok(),
            Err(e) => {
                warn!("Health check could not get a connection: {}", e);
                false
            }
        }
    }
}
