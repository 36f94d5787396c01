//! # Account Manager Service
//!
//! The AccountManager is the central service for account operations.
//! It coordinates between the account store, the credential hasher and
//! the session issuer.
//!
//! ## Responsibilities
//!
//! - Open accounts (with retry on account number collision)
//! - Read, update and close accounts
//! - Log in and issue session tokens
//! - Validate and execute transfers
//!
//! ## Flow Example: Transfer
//!
//! ```text
//! 1. Handler decodes the full TransferRequest
//!                ↓
//! 2. AccountManager.transfer() validates amount and distinct accounts
//!                ↓
//! 3. Source account resolved, balance checked
//!                ↓
//! 4. Store debits and credits in one atomic step
//!                ↓
//! 5. Request echoed back as confirmation
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::db::{Account, AccountStore, StoreError};
use crate::models::{CreateAccountRequest, LoginRequest, TransferRequest, UpdateAccountRequest};

use super::credentials::CredentialError;
use super::session::{SessionError, SessionIssuer};

/// How many fresh account numbers to try before giving up on a create.
pub const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Longest first or last name the schema accepts.
pub const MAX_NAME_LEN: usize = 50;

/// Errors that can occur in account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The request itself is malformed.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: i64, requested: i64 },

    /// Unknown account number or wrong password.
    #[error("Invalid account number or password")]
    InvalidCredentials,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Underlying persistence failure.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => AccountError::NotFound(what),
            StoreError::Conflict(what) => AccountError::Conflict(what),
            StoreError::InsufficientFunds { available, requested } => {
                AccountError::InsufficientFunds { available, requested }
            }
            StoreError::BalanceOverflow(number) => {
                AccountError::Validation(format!("transfer would overflow account {}", number))
            }
            other => AccountError::Store(other),
        }
    }
}

/// The main service for account operations.
///
/// ## Usage
///
/// ```rust,ignore
/// let manager = AccountManager::new(store, sessions);
///
/// let account = manager.create_account(request).await?;
/// manager.transfer(TransferRequest { from_account: 1, to_account: 2, amount: 30 }).await?;
/// ```
#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn AccountStore>,
    sessions: SessionIssuer,
}

impl AccountManager {
    pub fn new(store: Arc<dyn AccountStore>, sessions: SessionIssuer) -> Self {
        Self { store, sessions }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    // ==========================================
    // ACCOUNT LIFECYCLE
    // ==========================================

    /// Open a new account with zero balance.
    ///
    /// The password is hashed off the async executor. When the store
    /// reports the drawn account number as taken, a new number is drawn,
    /// up to [`ACCOUNT_NUMBER_ATTEMPTS`] times.
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<Account, AccountError> {
        validate_name("firstName", &request.first_name)?;
        validate_name("lastName", &request.last_name)?;
        if request.password.is_empty() {
            return Err(AccountError::Validation("password must not be empty".to_string()));
        }

        let CreateAccountRequest {
            first_name,
            last_name,
            password,
        } = request;

        let mut account = tokio::task::spawn_blocking(move || {
            Account::new(&first_name, &last_name, &password)
        })
        .await
        .map_err(|e| CredentialError::Hashing(e.to_string()))??;

        for attempt in 1..=ACCOUNT_NUMBER_ATTEMPTS {
            match self.store.create_account(&account).await {
                Ok(stored) => {
                    info!(
                        "Opened account {} (id {}, attempt {})",
                        stored.number, stored.id, attempt
                    );
                    return Ok(stored);
                }
                Err(StoreError::Conflict(what)) if attempt < ACCOUNT_NUMBER_ATTEMPTS => {
                    warn!("{} already taken, drawing a new number", what);
                    account.number = crate::db::generate_account_number();
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AccountError::Conflict("account number".to_string()))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        Ok(self.store.list_accounts().await?)
    }

    pub async fn get_account(&self, id: i32) -> Result<Account, AccountError> {
        Ok(self.store.get_account_by_id(id).await?)
    }

    /// Apply a partial update. Fields absent from `request` keep their value.
    pub async fn update_account(
        &self,
        id: i32,
        request: UpdateAccountRequest,
    ) -> Result<Account, AccountError> {
        let mut account = self.store.get_account_by_id(id).await?;

        if let Some(first_name) = request.first_name {
            validate_name("firstName", &first_name)?;
            account.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            validate_name("lastName", &last_name)?;
            account.last_name = last_name;
        }
        if let Some(number) = request.number {
            if number < 0 {
                return Err(AccountError::Validation("number must not be negative".to_string()));
            }
            account.number = number;
        }
        if let Some(balance) = request.balance {
            account.balance = balance;
        }

        self.store.update_account(&account).await?;
        Ok(account)
    }

    pub async fn delete_account(&self, id: i32) -> Result<(), AccountError> {
        self.store.delete_account(id).await?;
        info!("Closed account {}", id);
        Ok(())
    }

    // ==========================================
    // AUTHENTICATION
    // ==========================================

    /// Check credentials and issue a session token.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AccountError> {
        let account = match self.store.get_account_by_number(request.number).await {
            Ok(account) => account,
            Err(StoreError::NotFound(_)) => {
                warn!("Login for unknown account number {}", request.number);
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let candidate = account.clone();
        let matches = tokio::task::spawn_blocking(move || candidate.matches_password(&request.password))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        if !matches {
            warn!("Wrong password for account {}", account.number);
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.sessions.issue_token(&account)?;
        info!("Issued session for account {}", account.number);
        Ok(token)
    }

    // ==========================================
    // TRANSFERS
    // ==========================================

    /// Move `amount` from one account to another.
    ///
    /// ## Returns
    ///
    /// * `Ok(TransferRequest)` - The executed transfer
    /// * `Err(AccountError::Validation)` - Non-positive amount or self-transfer
    /// * `Err(AccountError::NotFound)` - Either account doesn't exist
    /// * `Err(AccountError::InsufficientFunds)` - Source can't cover the amount
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferRequest, AccountError> {
        if request.amount <= 0 {
            return Err(AccountError::Validation(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }
        if request.from_account == request.to_account {
            return Err(AccountError::Validation(
                "source and destination accounts must differ".to_string(),
            ));
        }

        let source = self.store.get_account_by_number(request.from_account).await?;
        if source.balance < request.amount {
            return Err(AccountError::InsufficientFunds {
                available: source.balance,
                requested: request.amount,
            });
        }

        debug!("Source {} can cover {}", source.number, request.amount);

        // The store re-checks the balance under its own lock.
        self.store.transfer(&request).await?;

        info!(
            "Transferred {} from {} to {}",
            request.amount, request.from_account, request.to_account
        );
        Ok(request)
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::Validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(AccountError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}
