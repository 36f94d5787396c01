//! # API Errors
//!
//! Every failed request is answered with a JSON body:
//!
//! ```json
//! { "error": "Insufficient funds: available 70, requested 1000" }
//! ```
//!
//! | Error | Status |
//! |-------|--------|
//! | malformed body / path, invalid input, insufficient funds | 400 |
//! | wrong account number or password | 401 |
//! | missing, invalid or expired token; token for another account | 403 |
//! | unknown account | 404 |
//! | account number taken | 409 |
//! | store or hashing failure | 500 |

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::error;

use crate::models::ErrorResponse;
use crate::services::{AccountError, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Details are logged, never sent to the client.
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::Validation(_) | AccountError::InsufficientFunds { .. } => {
                ApiError::BadRequest(e.to_string())
            }
            AccountError::NotFound(_) => ApiError::NotFound(e.to_string()),
            AccountError::Conflict(_) => ApiError::Conflict(e.to_string()),
            AccountError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            AccountError::Session(inner) => inner.into(),
            AccountError::Store(_) | AccountError::Credential(_) => {
                error!("Request failed: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Signing(_) => {
                error!("Token signing failed: {}", e);
                ApiError::Internal
            }
            SessionError::Invalid(_) => ApiError::Forbidden("invalid token".to_string()),
            SessionError::Expired => ApiError::Forbidden("token expired".to_string()),
        }
    }
}

/// Error handler for `web::Json` bodies that fail to decode.
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("invalid request body: {}", err)).into()
}

/// Error handler for path segments that fail to parse, e.g. `/account/abc`.
pub fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("invalid id: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AccountError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AccountError::InsufficientFunds { available: 1, requested: 2 },
                StatusCode::BAD_REQUEST,
            ),
            (AccountError::NotFound("account 1".into()), StatusCode::NOT_FOUND),
            (AccountError::Conflict("account number 1".into()), StatusCode::CONFLICT),
            (AccountError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AccountError::Session(SessionError::Expired), StatusCode::FORBIDDEN),
            (
                AccountError::Store(StoreError::ConnectionError("refused".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = ApiError::from(AccountError::Store(StoreError::ConnectionError(
            "password=hunter2 host=db".into(),
        )));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
