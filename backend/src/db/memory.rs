//! Process-local account store.
//!
//! All state sits behind one `RwLock`, so every write (transfers
//! included) is serialized and readers never see half of a transfer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::models::Account;
use super::{AccountStore, StoreError};
use crate::models::TransferRequest;

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<i32, Account>,
    last_id: i32,
}

impl Inner {
    fn find_by_number(&self, number: i64) -> Option<&Account> {
        self.accounts.values().find(|a| a.number == number)
    }

    fn id_of_number(&self, number: i64) -> Option<i32> {
        self.find_by_number(number).map(|a| a.id)
    }
}

/// [`AccountStore`] kept in memory. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn create_account(&self, account: &Account) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.find_by_number(account.number).is_some() {
            return Err(StoreError::Conflict(format!("account number {}", account.number)));
        }

        inner.last_id += 1;
        let stored = Account {
            id: inner.last_id,
            ..account.clone()
        };
        inner.accounts.insert(stored.id, stored.clone());

        info!("Account created: id={}, number={}", stored.id, stored.number);
        Ok(stored)
    }

    async fn delete_account(&self, id: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        inner
            .accounts
            .remove(&id)
            .map(|_| info!("Account deleted: {}", id))
            .ok_or_else(|| StoreError::NotFound(format!("account {}", id)))
    }

    async fn update_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(owner) = inner.id_of_number(account.number) {
            if owner != account.id {
                return Err(StoreError::Conflict(format!("account number {}", account.number)));
            }
        }

        let stored = inner
            .accounts
            .get_mut(&account.id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account.id)))?;

        stored.first_name = account.first_name.clone();
        stored.last_name = account.last_name.clone();
        stored.number = account.number;
        stored.balance = account.balance;

        info!("Account updated: {}", account.id);
        Ok(())
    }

    async fn get_account_by_id(&self, id: i32) -> Result<Account, StoreError> {
        let inner = self.inner.read().await;

        inner
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("account {}", id)))
    }

    async fn get_account_by_number(&self, number: i64) -> Result<Account, StoreError> {
        let inner = self.inner.read().await;

        inner
            .find_by_number(number)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("account number {}", number)))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.values().cloned().collect())
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<(), StoreError> {
        debug!(
            "Transferring {} from {} to {}",
            request.amount, request.from_account, request.to_account
        );

        let mut inner = self.inner.write().await;

        let from_id = inner.id_of_number(request.from_account).ok_or_else(|| {
            StoreError::NotFound(format!("account number {}", request.from_account))
        })?;
        let from_balance = inner.accounts[&from_id].balance;

        if from_balance < request.amount {
            return Err(StoreError::InsufficientFunds {
                available: from_balance,
                requested: request.amount,
            });
        }

        let to_id = inner.id_of_number(request.to_account).ok_or_else(|| {
            StoreError::NotFound(format!("account number {}", request.to_account))
        })?;
        let credited = inner.accounts[&to_id]
            .balance
            .checked_add(request.amount)
            .ok_or(StoreError::BalanceOverflow(request.to_account))?;

        // Every check passed; nothing below can fail.
        if let Some(from) = inner.accounts.get_mut(&from_id) {
            from.balance -= request.amount;
        }
        if let Some(to) = inner.accounts.get_mut(&to_id) {
            to.balance = credited;
        }

        info!(
            "Transfer committed: {} from {} to {}",
            request.amount, request.from_account, request.to_account
        );
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
