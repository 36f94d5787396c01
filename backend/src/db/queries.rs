//! # Database Queries
//!
//! This module contains all the SQL queries for the `account` table.
//! Each function performs a specific database operation.
//!
//! ## Error Handling
//!
//! All queries return `Result<T, StoreError>`. Common errors:
//! - `NotFound` - Record doesn't exist
//! - `Conflict` - Account number already taken
//! - `QueryError` - SQL execution failed

use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use tokio_postgres::Row;
use tracing::{debug, info};

use super::models::Account;
use super::StoreError;
use crate::models::TransferRequest;

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, password, number, balance, created_at";

// ============================================
// HELPER FUNCTIONS
// ============================================

/// Helper to convert a database row to Account
fn row_to_account(row: &Row) -> Account {
    Account {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password"),
        number: row.get("number"),
        balance: row.get("balance"),
        created_at: row.get("created_at"),
    }
}

/// Turn a unique-key violation into `Conflict`, pass anything else through.
fn map_write_error(e: tokio_postgres::Error, number: i64) -> StoreError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        StoreError::Conflict(format!("account number {}", number))
    } else {
        StoreError::QueryError(e)
    }
}

async fn get_client(pool: &Pool) -> Result<deadpool_postgres::Client, StoreError> {
    pool.get()
        .await
        .map_err(|e| StoreError::ConnectionError(e.to_string()))
}

// ============================================
// ACCOUNT QUERIES
// ============================================

/// Insert a new account, returning the stored row.
pub async fn insert_account(pool: &Pool, account: &Account) -> Result<Account, StoreError> {
    debug!("Inserting account number: {}", account.number);

    let client = get_client(pool).await?;

    let row = client
        .query_one(
            &format!(
                r#"
                INSERT INTO account (first_name, last_name, password, number, balance, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {ACCOUNT_COLUMNS}
                "#
            ),
            &[
                &account.first_name,
                &account.last_name,
                &account.password_hash,
                &account.number,
                &account.balance,
                &account.created_at,
            ],
        )
        .await
        .map_err(|e| map_write_error(e, account.number))?;

    let stored = row_to_account(&row);
    info!("Account created: id={}, number={}", stored.id, stored.number);
    Ok(stored)
}

/// Delete an account by id.
pub async fn delete_account(pool: &Pool, id: i32) -> Result<(), StoreError> {
    debug!("Deleting account: {}", id);

    let client = get_client(pool).await?;

    let rows_affected = client
        .execute("DELETE FROM account WHERE id = $1", &[&id])
        .await?;

    if rows_affected == 0 {
        return Err(StoreError::NotFound(format!("account {}", id)));
    }

    info!("Account deleted: {}", id);
    Ok(())
}

/// Replace name, number and balance of an account.
pub async fn update_account(pool: &Pool, account: &Account) -> Result<(), StoreError> {
    debug!("Updating account: {}", account.id);

    let client = get_client(pool).await?;

    let rows_affected = client
        .execute(
            r#"
            UPDATE account
            SET
                first_name = $1,
                last_name = $2,
                number = $3,
                balance = $4
            WHERE id = $5
            "#,
            &[
                &account.first_name,
                &account.last_name,
                &account.number,
                &account.balance,
                &account.id,
            ],
        )
        .await
        .map_err(|e| map_write_error(e, account.number))?;

    if rows_affected == 0 {
        return Err(StoreError::NotFound(format!("account {}", account.id)));
    }

    info!("Account updated: {}", account.id);
    Ok(())
}

/// Get an account by its id.
pub async fn get_account_by_id(pool: &Pool, id: i32) -> Result<Account, StoreError> {
    debug!("Fetching account by id: {}", id);

    let client = get_client(pool).await?;

    let row = client
        .query_opt(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = $1"),
            &[&id],
        )
        .await?;

    row.map(|r| row_to_account(&r))
        .ok_or_else(|| StoreError::NotFound(format!("account {}", id)))
}

/// Get an account by its public number.
pub async fn get_account_by_number(pool: &Pool, number: i64) -> Result<Account, StoreError> {
    debug!("Fetching account by number: {}", number);

    let client = get_client(pool).await?;

    let row = client
        .query_opt(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE number = $1"),
            &[&number],
        )
        .await?;

    row.map(|r| row_to_account(&r))
        .ok_or_else(|| StoreError::NotFound(format!("account number {}", number)))
}

/// Get all accounts.
pub async fn list_accounts(pool: &Pool) -> Result<Vec<Account>, StoreError> {
    debug!("Fetching all accounts");

    let client = get_client(pool).await?;

    let rows = client
        .query(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY id"),
            &[],
        )
        .await?;

    Ok(rows.iter().map(row_to_account).collect())
}

// ============================================
// TRANSFER
// ============================================

/// Move `amount` from one account to another inside one SQL transaction.
///
/// Both rows are locked `FOR UPDATE` in ascending number order, so two
/// transfers over the same pair cannot deadlock and cannot lose an
/// update. Any early return drops the transaction, which rolls it back.
pub async fn transfer(pool: &Pool, request: &TransferRequest) -> Result<(), StoreError> {
    debug!(
        "Transferring {} from {} to {}",
        request.amount, request.from_account, request.to_account
    );

    let mut client = get_client(pool).await?;
    let tx = client.transaction().await?;

    let numbers = vec![request.from_account, request.to_account];
    let rows = tx
        .query(
            r#"
            SELECT number, balance
            FROM account
            WHERE number = ANY($1)
            ORDER BY number
            FOR UPDATE
            "#,
            &[&numbers],
        )
        .await?;

    let balance_of = |number: i64| -> Option<i64> {
        rows.iter()
            .find(|row| row.get::<_, i64>("number") == number)
            .map(|row| row.get("balance"))
    };

    let from_balance = balance_of(request.from_account).ok_or_else(|| {
        StoreError::NotFound(format!("account number {}", request.from_account))
    })?;

    if from_balance < request.amount {
        return Err(StoreError::InsufficientFunds {
            available: from_balance,
            requested: request.amount,
        });
    }

    let to_balance = balance_of(request.to_account).ok_or_else(|| {
        StoreError::NotFound(format!("account number {}", request.to_account))
    })?;

    if to_balance.checked_add(request.amount).is_none() {
        return Err(StoreError::BalanceOverflow(request.to_account));
    }

    tx.execute(
        "UPDATE account SET balance = balance - $1 WHERE number = $2",
        &[&request.amount, &request.from_account],
    )
    .await?;

    tx.execute(
        "UPDATE account SET balance = balance + $1 WHERE number = $2",
        &[&request.amount, &request.to_account],
    )
    .await?;

    tx.commit().await?;

    info!(
        "Transfer committed: {} from {} to {}",
        request.amount, request.from_account, request.to_account
    );
    Ok(())
}
