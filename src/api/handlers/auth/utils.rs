//! Small helpers for credential handling and session token generation.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("failed to gather randomness: {0}")]
    Random(#[from] rand::Error),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Password hashing scheme behind login, init, and password change.
pub trait PasswordHasher: Send + Sync + std::fmt::Debug {
    /// Hash a password for storage.
    ///
    /// # Errors
    /// Returns an error if the scheme cannot produce a hash.
    fn hash(&self, password: &SecretString) -> Result<String, CryptoError>;

    /// Check a password against a stored hash. A malformed hash never verifies.
    fn verify(&self, password: &SecretString, hash: &str) -> bool;
}

/// argon2id with default parameters, stored as a PHC string.
#[derive(Clone, Copy, Debug, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &SecretString) -> Result<String, CryptoError> {
        hash_password(password)
    }

    fn verify(&self, password: &SecretString, hash: &str) -> bool {
        verify_password(password, hash)
    }
}

/// Normalize a username for lookup/uniqueness checks.
pub(crate) fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Hash a password into an argon2 PHC string.
fn hash_password(password: &SecretString) -> Result<String, CryptoError> {
    let mut salt_bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut salt_bytes)?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|err| CryptoError::Hash(err.to_string()))?;
    Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CryptoError::Hash(err.to_string()))
}

/// Constant-time check of a password against a stored PHC string.
///
/// An unparseable hash never verifies.
fn verify_password(password: &SecretString, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.expose_secret().as_bytes(), &parsed)
            .is_ok()
    })
}

/// Create a new session token for the auth cookie.
pub(crate) fn generate_session_token() -> Result<String, CryptoError> {
    let mut bytes = [0u8; 32];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Namespaced session-store key for a token.
pub(crate) fn session_key(prefix: &str, token: &str) -> String {
    format!("{prefix}:{token}")
}
