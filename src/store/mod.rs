//! Credential and session store capabilities.
//!
//! The admin panel never owns its persistence: accounts live behind
//! [`AccountStore`] and login sessions behind [`SessionStore`]. Both are
//! object-safe so the application can hold them as `Arc<dyn _>` and swap the
//! Postgres backends for the in-memory ones in tests or development.

use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::{MemoryAccountStore, MemorySessionStore};
pub use postgres::{PgAccountStore, PgSessionStore};

/// An admin account as seen by the login flows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    /// Case-folded username.
    pub username: String,
    /// argon2 PHC string.
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("username already exists: {0}")]
    Conflict(String),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its case-folded username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Whether at least one account exists (drives the first-run bootstrap).
    async fn any_exists(&self) -> Result<bool, StoreError>;

    /// Create an account.
    ///
    /// # Errors
    /// Returns [`StoreError::Conflict`] when the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<Account, StoreError>;

    /// Create the account only if no account exists yet, atomically.
    ///
    /// Returns `None` when another account is already present.
    async fn create_first(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Persist a new password hash for an existing account.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError>;
}

/// Key-value store mapping a namespaced session key to an account id.
///
/// Expiry is the store's job: once the TTL elapses, `get` and `ttl` must
/// behave as if the key was never written.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write (or overwrite) a key with the given expiry in one operation.
    async fn set(&self, key: &str, account_id: Uuid, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<Uuid>, StoreError>;

    /// Remove a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Remaining lifetime of a live key.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError>;
}
