//! # API Models
//!
//! Request and response bodies of the account REST API. The account
//! itself is serialized straight from `db::Account`, which already hides
//! its password hash; everything else the handlers read or write lives here.
//!
//! ## Organization
//!
//! - `requests.rs` - Incoming request bodies
//! - `responses.rs` - Outgoing response bodies
//!
//! ## Serialization
//!
//! Field names are camelCase on the wire (`firstName`, `fromAccount`).

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
