//! # Bank Account Backend Service
//!
//! This is the main entry point for the account service. It provides:
//!
//! - REST API for opening, reading, updating and closing accounts
//! - Login with account number and password, returning a session token
//! - Atomic balance transfers between accounts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        BACKEND SERVICE                           │
//! │                                                                  │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                    REST API (Actix)                        │  │
//! │  │  /account   /account/{id}   /transfer   /login   /health   │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                          │                                       │
//! │  ┌───────────────────────┴───────────────────────────────────┐  │
//! │  │                    SERVICE LAYER                           │  │
//! │  │  ┌──────────────┐ ┌──────────────┐ ┌──────────────────┐   │  │
//! │  │  │AccountManager│ │SessionIssuer │ │Credential Hasher │   │  │
//! │  │  └──────────────┘ └──────────────┘ └──────────────────┘   │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │                          │                                       │
//! │                ┌─────────┴─────────┐                             │
//! │                │   AccountStore    │                             │
//! │                ├─────────┬─────────┤                             │
//! │                │PostgreSQL│ Memory  │                            │
//! │                └─────────┴─────────┘                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Set up PostgreSQL and create the database
//! 2. Create a `.env` with `DB_USER`, `DB_NAME`, `DB_PASSWORD` and `JWT_SECRET`
//! 3. Start the server: `cargo run` (the schema is applied on startup)
//!
//! Set `STORAGE_BACKEND=memory` to run without a database.

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod models;
mod services;

use config::{AppConfig, StorageBackend};
use db::{AccountStore, Database, InMemoryStore, PostgresStore};
use services::{AccountManager, SessionIssuer};

/// Application state shared across all handlers.
///
/// Built once in `main` and handed to every worker through `web::Data`.
pub struct AppState {
    /// Account operations, holding the store and the session issuer.
    pub manager: AccountManager,
}

/// Main entry point for the backend service.
///
/// This function:
/// 1. Loads configuration from environment
/// 2. Builds the account store
/// 3. Builds the session issuer and account manager
/// 4. Launches the HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // =========================================
    // STEP 1: Load Configuration
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    // =========================================
    // STEP 2: Initialize Logging
    // =========================================
    // RUST_LOG overrides the default level, e.g. RUST_LOG=bank_backend=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("🚀 Starting Bank Account Backend Service");

    let config = AppConfig::from_env().expect("Failed to load configuration");

    info!("📋 Configuration loaded");
    info!("   Storage backend: {:?}", config.storage_backend);
    info!("   Token lifetime: {}s", config.token_ttl.as_secs());

    // =========================================
    // STEP 3: Initialize Store
    // =========================================
    let store: Arc<dyn AccountStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .expect("Postgres backend requires database settings");

            let db = Database::connect(database, config.db_max_connections, config.db_timeout)
                .await
                .expect("Failed to connect to database");

            info!("🗄️  Database connected");

            db.run_migrations()
                .await
                .expect("Failed to run migrations");

            info!("📦 Database migrations complete");

            Arc::new(PostgresStore::new(db))
        }
        StorageBackend::Memory => {
            info!("🧠 Using in-memory store, data will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
    };

    // =========================================
    // STEP 4: Initialize Services
    // =========================================
    let sessions = SessionIssuer::new(&config.jwt_secret, config.token_ttl);
    let manager = AccountManager::new(store, sessions);

    info!("🔧 Services initialized");

    let app_state = Arc::new(AppState { manager });

    // =========================================
    // STEP 5: Start HTTP Server
    // =========================================
    let server_host = config.server_host.clone();
    let server_port = config.server_port;

    info!("🌐 Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))

            // Add logging middleware
            .wrap(middleware::Logger::default())

            // Configure API routes
            .configure(api::configure_routes)
    })
    .client_request_timeout(config.request_timeout)
    .bind((server_host, server_port))?
    .run()
    .await
}
