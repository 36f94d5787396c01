//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::web;

use super::error::{json_error_handler, path_error_handler};
use super::handlers;

/// Configure all API routes.
///
/// This function is called from main.rs to set up
/// all the endpoint routes.
///
/// ## Route Structure
///
/// ```text
/// /
/// ├── /health              GET    - Health check
/// ├── /account             GET    - List accounts
/// │                        POST   - Open account
/// ├── /account/{id}        GET    - Get account      (token)
/// │                        PUT    - Update account   (token)
/// │                        DELETE - Close account    (token)
/// ├── /transfer            POST   - Transfer balance
/// └── /login               POST   - Get session token
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Malformed bodies and ids answer with the JSON error shape
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))

        .route("/health", web::get().to(handlers::health_check))

        .service(
            web::resource("/account")
                .route(web::get().to(handlers::get_accounts))
                .route(web::post().to(handlers::create_account)),
        )
        .service(
            web::resource("/account/{id}")
                .route(web::get().to(handlers::get_account_by_id))
                .route(web::put().to(handlers::update_account))
                .route(web::delete().to(handlers::delete_account)),
        )

        .route("/transfer", web::post().to(handlers::transfer))
        .route("/login", web::post().to(handlers::login));
}
