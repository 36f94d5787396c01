//! # API Response Models
//!
//! Structures for outgoing API response bodies.
//!
//! Successful responses carry their payload directly (an account, a list
//! of accounts, an echoed transfer). Failures always use [`ErrorResponse`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned for every failed request.
///
/// ```json
/// { "error": "account 42 not found" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Returned by update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i32,
}

/// Returned by `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub jwt: String,
}

/// Health check response.
///
/// ## Example Response
///
/// ```json
/// {
///     "status": "healthy",
///     "store": true,
///     "version": "0.1.0",
///     "timestamp": "2026-01-08T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "healthy" or "unhealthy".
    pub status: String,

    /// Whether the account store answered.
    pub store: bool,

    pub version: String,

    pub timestamp: DateTime<Utc>,
}
