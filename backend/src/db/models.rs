//! # Database Models
//!
//! This module defines the data structures that map to database tables.
//!
//! ## Table Overview
//!
//! | Table | Description |
//! |-------|-------------|
//! | `account` | One row per bank account, with its credential hash |
//!
//! ```text
//! ┌──────────────────────────┐
//! │         account          │
//! │                          │
//! │ id (PK, serial)          │
//! │ first_name               │
//! │ last_name                │
//! │ password (bytea)         │
//! │ number (unique)          │
//! │ balance                  │
//! │ created_at               │
//! └──────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::services::credentials::{self, CredentialError};

/// Account numbers are drawn uniformly from `0..ACCOUNT_NUMBER_SPACE`.
pub const ACCOUNT_NUMBER_SPACE: i64 = 1_000_000;

/// A bank account.
///
/// Instances handed out by a store are detached copies: mutating one
/// has no effect until it is passed back through the store.
///
/// ## Note on Types
///
/// We use signed integers because PostgreSQL doesn't have
/// unsigned ones. `balance` is in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Store-assigned identifier. Zero until the account is persisted.
    pub id: i32,

    pub first_name: String,

    pub last_name: String,

    /// Argon2 PHC string bytes. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,

    /// Public account number used for login and transfers.
    pub number: i64,

    pub balance: i64,

    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a new, not yet persisted account.
    ///
    /// Hashes `password`, draws a random account number, starts at a
    /// zero balance and stamps the creation time in UTC.
    pub fn new(first_name: &str, last_name: &str, password: &str) -> Result<Self, CredentialError> {
        let password_hash = credentials::hash_password(password)?;

        Ok(Self {
            id: 0,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password_hash,
            number: generate_account_number(),
            balance: 0,
            created_at: Utc::now(),
        })
    }

    /// Check a plaintext password against the stored hash.
    ///
    /// Returns `false` on mismatch or if the stored hash is malformed.
    pub fn matches_password(&self, password: &str) -> bool {
        credentials::verify_password(&self.password_hash, password)
    }
}

/// Draw a fresh account number.
///
/// Uniqueness is enforced by the store, not here.
pub fn generate_account_number() -> i64 {
    rand::thread_rng().gen_range(0..ACCOUNT_NUMBER_SPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_empty() {
        let before = Utc::now();
        let account = Account::new("Ada", "Lovelace", "pw").unwrap();

        assert_eq!(account.balance, 0);
        assert_eq!(account.id, 0);
        assert!(!account.password_hash.is_empty());
        assert_ne!(account.password_hash, b"pw".to_vec());
        assert!(account.created_at >= before);
        assert!((0..ACCOUNT_NUMBER_SPACE).contains(&account.number));
    }

    #[test]
    fn test_matches_password() {
        let account = Account::new("Ada", "Lovelace", "pw").unwrap();

        assert!(account.matches_password("pw"));
        assert!(!account.matches_password("wrong"));
    }

    #[test]
    fn test_serialization_omits_password() {
        let account = Account::new("Ada", "Lovelace", "pw").unwrap();
        let json = serde_json::to_value(&account).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["balance"], 0);
        assert!(json.get("createdAt").is_some());
    }
}
