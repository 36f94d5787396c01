//! # REST API Module
//!
//! This module defines all HTTP endpoints of the account service.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | GET | `/account` | - | List accounts |
//! | POST | `/account` | - | Open account |
//! | GET | `/account/{id}` | token | Get account |
//! | PUT | `/account/{id}` | token | Update account |
//! | DELETE | `/account/{id}` | token | Close account |
//! | POST | `/transfer` | - | Transfer balance |
//! | POST | `/login` | - | Get session token |
//! | GET | `/health` | - | Health check |
//!
//! ## Request/Response Format
//!
//! Bodies are JSON. Successful responses carry the payload directly;
//! failures carry `{"error": "<message>"}`. The session token travels in
//! the `x-jwt-token` header.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;

pub use routes::configure_routes;
