//! # Request Authentication
//!
//! Protected handlers take an [`AuthenticatedAccount`] argument. The
//! extractor reads the session token from the `x-jwt-token` header and
//! rejects the request with 403 before the handler runs if it is missing,
//! malformed, badly signed or expired.

use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use tracing::{error, warn};

use super::error::ApiError;
use crate::db::Account;
use crate::AppState;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// The account number asserted by a valid session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub number: i64,
}

impl AuthenticatedAccount {
    /// Only the holder of `account` may read or change it.
    pub fn ensure_owns(&self, account: &Account) -> Result<(), ApiError> {
        if self.number == account.number {
            Ok(())
        } else {
            warn!(
                "Account {} attempted to access account {}",
                self.number, account.number
            );
            Err(ApiError::Forbidden(format!(
                "token does not grant access to account {}",
                account.id
            )))
        }
    }
}

impl FromRequest for AuthenticatedAccount {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedAccount, ApiError> {
    let state = req.app_data::<web::Data<Arc<AppState>>>().ok_or_else(|| {
        error!("Application state missing from request");
        ApiError::Internal
    })?;

    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Forbidden(format!("missing {} header", TOKEN_HEADER)))?;

    let number = state.manager.sessions().validate_token(token).map_err(|e| {
        warn!("Rejected session token: {}", e);
        ApiError::from(e)
    })?;

    Ok(AuthenticatedAccount { number })
}
