//! # Database Module
//!
//! This module is the persistence boundary of the account service.
//!
//! Handlers and services only ever see the [`AccountStore`] trait, so the
//! backing engine is chosen once at startup:
//!
//! - [`PostgresStore`] - PostgreSQL through a deadpool connection pool
//! - [`InMemoryStore`] - process-local map, for demos and tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      DATABASE LAYER                              │
//! │                                                                  │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │               dyn AccountStore (async trait)              │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                  │                           │                   │
//! │                  ▼                           ▼                   │
//! │  ┌──────────────────────────┐    ┌───────────────────────┐      │
//! │  │     PostgresStore        │    │    InMemoryStore      │      │
//! │  │  Connection Pool         │    │  RwLock<BTreeMap>     │      │
//! │  │  (deadpool-postgres)     │    │                       │      │
//! │  └──────────────────────────┘    └───────────────────────┘      │
//! │                  │                                               │
//! │                  ▼                                               │
//! │           ┌────────────┐                                         │
//! │           │  account   │                                         │
//! │           │   table    │                                         │
//! │           └────────────┘                                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;
pub mod models;
pub mod postgres;
pub mod queries;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::TransferRequest;

/// Store-level errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to connect to the database
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryError(#[from] tokio_postgres::Error),

    /// Migration failed
    #[error("Migration failed: {0}")]
    MigrationError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Record not found
    #[error("{0} not found")]
    NotFound(String),

    /// A unique key is already taken
    #[error("{0} already exists")]
    Conflict(String),

    /// Source account cannot cover a transfer
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    /// A credit would overflow the destination balance
    #[error("Balance overflow on account {0}")]
    BalanceOverflow(i64),
}

/// Persistence contract for accounts.
///
/// Every method hands out or takes detached copies; nothing returned
/// keeps a reference into the store.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return the stored copy with its id.
    ///
    /// `Conflict` if the account number is taken.
    async fn create_account(&self, account: &Account) -> Result<Account, StoreError>;

    /// `NotFound` if no account has this id.
    async fn delete_account(&self, id: i32) -> Result<(), StoreError>;

    /// Replace name, number and balance of the account with `account.id`.
    async fn update_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn get_account_by_id(&self, id: i32) -> Result<Account, StoreError>;

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError>;

    /// All accounts, ordered by id.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Debit `from_account` and credit `to_account` by `amount` as one unit.
    ///
    /// Either both balances change or neither does. Fails with `NotFound`
    /// for a missing side and `InsufficientFunds` when the source balance,
    /// read under the same lock as the write, is below `amount`.
    async fn transfer(&self, request: &TransferRequest) -> Result<(), StoreError>;

    /// Whether the backing engine currently answers.
    async fn health_check(&self) -> bool;
}

// Re-export commonly used items
pub use memory::InMemoryStore;
pub use models::*;
pub use postgres::{Database, PostgresStore};
