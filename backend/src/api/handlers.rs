//! # API Request Handlers
//!
//! This module contains the handler functions for each API endpoint.
//! Each handler:
//! 1. Extracts and fully decodes request data
//! 2. Calls the account manager
//! 3. Returns a JSON response
//!
//! ## Error Handling
//!
//! Handlers return `Result<HttpResponse, ApiError>`; `ApiError` renders
//! itself as `{"error": "..."}` with the matching status code.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use tracing::info;

use super::auth::AuthenticatedAccount;
use super::error::ApiError;
use crate::models::{
    CreateAccountRequest, HealthResponse, IdResponse, LoginRequest, LoginResponse,
    TransferRequest, UpdateAccountRequest,
};
use crate::AppState;

/// Health check endpoint.
///
/// ## Endpoint
///
/// `GET /health`
///
/// ## Example
///
/// ```bash
/// curl http://127.0.0.1:3000/health
/// ```
pub async fn health_check(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let store_healthy = state.manager.store().health_check().await;

    let response = HealthResponse {
        status: if store_healthy { "healthy" } else { "unhealthy" }.to_string(),
        store: store_healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    let status_code = if store_healthy {
        actix_web::http::StatusCode::OK
    } else {
        actix_web::http::StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code).json(response)
}

/// List all accounts.
///
/// ## Endpoint
///
/// `GET /account`
pub async fn get_accounts(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    let accounts = state.manager.list_accounts().await?;
    Ok(HttpResponse::Ok().json(accounts))
}

/// Get one account. The token must belong to it.
///
/// ## Endpoint
///
/// `GET /account/{id}` with header `x-jwt-token`
pub async fn get_account_by_id(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedAccount,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let account = state.manager.get_account(path.into_inner()).await?;
    auth.ensure_owns(&account)?;

    Ok(HttpResponse::Ok().json(account))
}

/// Open an account.
///
/// ## Endpoint
///
/// `POST /account`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:3000/account \
///   -H "Content-Type: application/json" \
///   -d '{"firstName": "Ada", "lastName": "Lovelace", "password": "correct horse"}'
/// ```
///
/// ## Response
///
/// ```json
/// {
///     "id": 1,
///     "firstName": "Ada",
///     "lastName": "Lovelace",
///     "number": 482913,
///     "balance": 0,
///     "createdAt": "2026-01-08T12:00:00Z"
/// }
/// ```
pub async fn create_account(
    state: web::Data<Arc<AppState>>,
    body: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let account = state.manager.create_account(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Partially update an account. The token must belong to it.
///
/// ## Endpoint
///
/// `PUT /account/{id}` with header `x-jwt-token`
///
/// Body: any of `firstName`, `lastName`, `number`, `balance`.
///
/// Tokens assert an account number, so changing `number` ends the
/// caller's session: the holder logs in again with the new number.
pub async fn update_account(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedAccount,
    path: web::Path<i32>,
    body: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let account = state.manager.get_account(id).await?;
    auth.ensure_owns(&account)?;

    state.manager.update_account(id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(IdResponse { id }))
}

/// Close an account. The token must belong to it.
///
/// ## Endpoint
///
/// `DELETE /account/{id}` with header `x-jwt-token`
pub async fn delete_account(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedAccount,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let account = state.manager.get_account(id).await?;
    auth.ensure_owns(&account)?;

    state.manager.delete_account(id).await?;
    Ok(HttpResponse::Ok().json(IdResponse { id }))
}

/// Move balance between two accounts.
///
/// ## Endpoint
///
/// `POST /transfer`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:3000/transfer \
///   -H "Content-Type: application/json" \
///   -d '{"fromAccount": 482913, "toAccount": 118204, "amount": 30}'
/// ```
///
/// The request is echoed back on success.
pub async fn transfer(
    state: web::Data<Arc<AppState>>,
    body: web::Json<TransferRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    info!(
        "Transfer request: {} from {} to {}",
        request.amount, request.from_account, request.to_account
    );

    let confirmed = state.manager.transfer(request).await?;
    Ok(HttpResponse::Ok().json(confirmed))
}

/// Exchange account number and password for a session token.
///
/// ## Endpoint
///
/// `POST /login`
///
/// ## Response
///
/// ```json
/// { "jwt": "eyJhbGciOiJIUzI1NiJ9..." }
/// ```
pub async fn login(
    state: web::Data<Arc<AppState>>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let jwt = state.manager.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LoginResponse { jwt }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::api::auth::TOKEN_HEADER;
    use crate::api::configure_routes;
    use crate::config::Secret;
    use crate::db::InMemoryStore;
    use crate::services::{AccountManager, SessionIssuer};

    fn state() -> Arc<AppState> {
        let sessions = SessionIssuer::new(&Secret::new("handler-tests"), Duration::from_secs(60));
        Arc::new(AppState {
            manager: AccountManager::new(Arc::new(InMemoryStore::new()), sessions),
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    macro_rules! call {
        ($app:expr, $req:expr) => {{
            let resp = test::call_service(&$app, $req.to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    macro_rules! open_account {
        ($app:expr, $password:expr) => {{
            let (status, body) = call!(
                $app,
                test::TestRequest::post().uri("/account").set_json(json!({
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "password": $password,
                }))
            );
            assert_eq!(status, StatusCode::OK);
            body
        }};
    }

    macro_rules! login {
        ($app:expr, $number:expr, $password:expr) => {{
            let (status, body) = call!(
                $app,
                test::TestRequest::post()
                    .uri("/login")
                    .set_json(json!({ "number": $number, "password": $password }))
            );
            assert_eq!(status, StatusCode::OK);
            body["jwt"].as_str().unwrap().to_string()
        }};
    }

    async fn set_balance(state: &Arc<AppState>, id: i64, balance: i64) {
        state
            .manager
            .update_account(
                id as i32,
                UpdateAccountRequest {
                    balance: Some(balance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn test_create_and_list_accounts() {
        let state = state();
        let app = app!(state);

        let created = open_account!(app, "pw");
        assert_eq!(created["balance"], 0);
        assert_eq!(created["firstName"], "Ada");
        assert!(created.get("passwordHash").is_none());
        assert!(created.get("password").is_none());

        let (status, body) = call!(app, test::TestRequest::get().uri("/account"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["number"], created["number"]);
    }

    #[actix_web::test]
    async fn test_create_rejects_malformed_body() {
        let state = state();
        let app = app!(state);

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/account")
                .set_json(json!({ "firstName": "Ada" }))
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
    }

    #[actix_web::test]
    async fn test_login_and_read_own_account() {
        let state = state();
        let app = app!(state);
        let created = open_account!(app, "pw");
        let token = login!(app, created["number"], "pw");

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri(&format!("/account/{}", created["id"]))
                .insert_header((TOKEN_HEADER, token))
        );

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password() {
        let state = state();
        let app = app!(state);
        let created = open_account!(app, "pw");

        let (status, body) = call!(
            app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(json!({ "number": created["number"], "password": "nope" }))
        );

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid account number or password");
    }

    #[actix_web::test]
    async fn test_protected_routes_need_a_valid_token() {
        let state = state();
        let app = app!(state);
        let created = open_account!(app, "pw");
        let uri = format!("/account/{}", created["id"]);

        let (status, _) = call!(app, test::TestRequest::get().uri(&uri));
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call!(
            app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, "garbage"))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "invalid token");

        let foreign = SessionIssuer::new(&Secret::new("someone else"), Duration::from_secs(60));
        let account = state.manager.get_account(created["id"].as_i64().unwrap() as i32).await.unwrap();
        let forged = foreign.issue_token(&account).unwrap();
        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, forged))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_token_only_grants_its_own_account() {
        let state = state();
        let app = app!(state);
        let mine = open_account!(app, "pw");
        let theirs = open_account!(app, "pw");
        let token = login!(app, mine["number"], "pw");

        let (status, _) = call!(
            app,
            test::TestRequest::delete()
                .uri(&format!("/account/{}", theirs["id"]))
                .insert_header((TOKEN_HEADER, token))
        );

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(state.manager.list_accounts().await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_bad_and_unknown_ids() {
        let state = state();
        let app = app!(state);
        let created = open_account!(app, "pw");
        let token = login!(app, created["number"], "pw");

        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri("/account/abc")
                .insert_header((TOKEN_HEADER, token.clone()))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid id"));

        let (status, _) = call!(
            app,
            test::TestRequest::delete()
                .uri("/account/9999")
                .insert_header((TOKEN_HEADER, token))
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(state.manager.list_accounts().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_update_and_delete_own_account() {
        let state = state();
        let app = app!(state);
        let created = open_account!(app, "pw");
        let token = login!(app, created["number"], "pw");
        let uri = format!("/account/{}", created["id"]);

        let (status, body) = call!(
            app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, token.clone()))
                .set_json(json!({ "lastName": "King" }))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": created["id"] }));

        let id = created["id"].as_i64().unwrap() as i32;
        let stored = state.manager.get_account(id).await.unwrap();
        assert_eq!(stored.first_name, "Ada");
        assert_eq!(stored.last_name, "King");

        let (status, body) = call!(
            app,
            test::TestRequest::delete()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": created["id"] }));
        assert!(state.manager.list_accounts().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_number_change_requires_new_login() {
        let state = state();
        let app = app!(state);
        let created = open_account!(app, "pw");
        let old_token = login!(app, created["number"], "pw");
        let uri = format!("/account/{}", created["id"]);
        let new_number = (created["number"].as_i64().unwrap() + 1) % 1_000_000;

        let (status, _) = call!(
            app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, old_token.clone()))
                .set_json(json!({ "number": new_number }))
        );
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call!(
            app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, old_token))
        );
        assert_eq!(status, StatusCode::FORBIDDEN);

        let new_token = login!(app, new_number, "pw");
        let (status, body) = call!(
            app,
            test::TestRequest::get()
                .uri(&uri)
                .insert_header((TOKEN_HEADER, new_token))
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], new_number);
    }

    #[actix_web::test]
    async fn test_transfer_scenario() {
        let state = state();
        let app = app!(state);
        let a = open_account!(app, "pw");
        let b = open_account!(app, "pw");
        set_balance(&state, a["id"].as_i64().unwrap(), 100).await;
        set_balance(&state, b["id"].as_i64().unwrap(), 50).await;

        let request = json!({ "fromAccount": a["number"], "toAccount": b["number"], "amount": 30 });
        let (status, body) = call!(
            app,
            test::TestRequest::post().uri("/transfer").set_json(&request)
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, request);

        let (status, body) = call!(
            app,
            test::TestRequest::post().uri("/transfer").set_json(json!({
                "fromAccount": a["number"],
                "toAccount": b["number"],
                "amount": 1000,
            }))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Insufficient funds"));

        let (_, accounts) = call!(app, test::TestRequest::get().uri("/account"));
        let balances: Vec<i64> = accounts
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["balance"].as_i64().unwrap())
            .collect();
        assert_eq!(balances, vec![70, 80]);
    }

    #[actix_web::test]
    async fn test_transfer_errors() {
        let state = state();
        let app = app!(state);
        let a = open_account!(app, "pw");
        set_balance(&state, a["id"].as_i64().unwrap(), 100).await;
        let ghost = (a["number"].as_i64().unwrap() + 1) % 1_000_000;

        let (status, _) = call!(
            app,
            test::TestRequest::post().uri("/transfer").set_json(json!({
                "fromAccount": a["number"],
                "toAccount": ghost,
                "amount": 10,
            }))
        );
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call!(
            app,
            test::TestRequest::post().uri("/transfer").set_json(json!({
                "fromAccount": a["number"],
                "toAccount": a["number"],
                "amount": 10,
            }))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/transfer")
                .set_json(json!({ "fromAccount": a["number"] }))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let id = a["id"].as_i64().unwrap() as i32;
        assert_eq!(state.manager.get_account(id).await.unwrap().balance, 100);
    }

    #[actix_web::test]
    async fn test_health_check() {
        let state = state();
        let app = app!(state);

        let (status, body) = call!(app, test::TestRequest::get().uri("/health"));

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], true);
    }
}
