//! # Services Module
//!
//! This module contains the business logic of the account service.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `AccountManager` | Account lifecycle, login, transfers |
//! | `SessionIssuer` | Signing and checking session tokens |
//! | `credentials` | Argon2 password hashing and verification |
//!
//! ## Service Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SERVICES LAYER                            │
//! │                                                                  │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │                    AccountManager                         │   │
//! │  │  • create_account()  • update_account()  • login()        │   │
//! │  │  • delete_account()  • transfer()                         │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                              │                                   │
//! │         ┌────────────────────┼────────────────────┐             │
//! │         ▼                    ▼                    ▼             │
//! │  ┌────────────┐      ┌────────────┐       ┌────────────┐       │
//! │  │ Credential │      │  Session   │       │  Account   │       │
//! │  │   Hasher   │      │  Issuer    │       │   Store    │       │
//! │  │            │      │            │       │            │       │
//! │  │ Argon2id   │      │ HS256 JWT  │       │ (db layer) │       │
//! │  └────────────┘      └────────────┘       └────────────┘       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod account_manager;
pub mod credentials;
pub mod session;

pub use account_manager::{AccountError, AccountManager};
pub use session::{SessionError, SessionIssuer};
