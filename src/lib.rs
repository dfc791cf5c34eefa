//! # Gatehouse (admin panel login and sessions)
//!
//! `gatehouse` is the front door of an auto-generated admin panel. It mounts
//! login, logout, first-run initialization, and password-change pages under an
//! admin path and guards every admin route with a session middleware.
//!
//! ## Stores
//!
//! Persistence is delegated to two capabilities:
//!
//! - [`store::AccountStore`]: admin accounts (case-folded username and argon2
//!   password hash).
//! - [`store::SessionStore`]: `<prefix>:<token> -> account id` with a TTL.
//!
//! Both ship with Postgres and in-memory implementations.
//!
//! ## Wiring
//!
//! ```no_run
//! use gatehouse::api::{AdminApp, Resource};
//! use gatehouse::store::{MemoryAccountStore, MemorySessionStore};
//! use std::sync::Arc;
//!
//! let router = AdminApp::new(
//!     Arc::new(MemoryAccountStore::new()),
//!     Arc::new(MemorySessionStore::new()),
//! )
//! .with_admin_path("/admin")
//! .with_resource(Resource::model("Users", "user"))
//! .router();
//! # let _ = router;
//! ```

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
