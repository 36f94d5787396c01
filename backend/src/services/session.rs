//! # Session Issuer
//!
//! Issues and validates the bearer tokens handed out by `POST /login`.
//!
//! Tokens are HS256 JWTs signed with the configured shared secret:
//!
//! ```json
//! {
//!     "accountNumber": 482913,
//!     "iat": 1760000000,
//!     "exp": 1760000900,
//!     "jti": "550e8400-e29b-41d4-a716-446655440000"
//! }
//! ```
//!
//! Expiry is enforced with zero leeway.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::Secret;
use crate::db::Account;

/// Errors from issuing or validating a session token.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The signing backend failed.
    #[error("Failed to sign token: {0}")]
    Signing(String),

    /// Bad signature, wrong algorithm or malformed token.
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// The token is past its expiry.
    #[error("Token expired")]
    Expired,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// The authenticated account's number.
    pub account_number: i64,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,

    /// Unique token id.
    pub jti: String,
}

/// Creates and checks session tokens.
///
/// Built once at startup from configuration and shared through `AppState`.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &Secret, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            ttl,
        }
    }

    /// Issue a token asserting `account`'s number.
    pub fn issue_token(&self, account: &Account) -> Result<String, SessionError> {
        let now = Utc::now().timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                SessionError::Signing(format!(
                    "token lifetime of {}s is out of range",
                    self.ttl.as_secs()
                ))
            })?;

        let claims = SessionClaims {
            account_number: account.number,
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        self.sign(&claims)
    }

    /// Validate a token and return the account number it asserts.
    pub fn validate_token(&self, token: &str) -> Result<i64, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid(e.to_string()),
            }
        })?;

        debug!("Validated session token {}", data.claims.jti);
        Ok(data.claims.account_number)
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }
}
