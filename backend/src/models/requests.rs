//! # API Request Models
//!
//! Structures for incoming API request bodies.
//! Each struct represents the expected JSON body for an endpoint.

use serde::{Deserialize, Serialize};

/// Request to open a new account.
///
/// ## Example JSON
///
/// ```json
/// {
///     "firstName": "Ada",
///     "lastName": "Lovelace",
///     "password": "correct horse"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Partial update of an account.
///
/// Absent fields keep their stored value.
///
/// ## Example JSON
///
/// ```json
/// {
///     "lastName": "King"
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub number: Option<i64>,
    pub balance: Option<i64>,
}

/// Request to move balance between two accounts.
///
/// Echoed back as the confirmation of a successful transfer.
///
/// ## Example JSON
///
/// ```json
/// {
///     "fromAccount": 482913,
///     "toAccount": 118204,
///     "amount": 30
/// }
/// ```
///
/// ## Notes
///
/// - `amount` is in the smallest currency unit and must be positive
/// - `fromAccount` and `toAccount` must differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Source account number.
    pub from_account: i64,

    /// Destination account number.
    pub to_account: i64,

    /// Amount to move.
    pub amount: i64,
}

/// Login with account number and password.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}
