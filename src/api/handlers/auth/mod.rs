//! Auth handlers and supporting modules.
//!
//! This module implements the username/password provider: the session
//! middleware guarding every admin page, login and logout, the first-run
//! bootstrap at `/init`, and password change.
//!
//! ## Sessions
//!
//! A successful login stores `<prefix>:<token> -> account id` in the session
//! store with a TTL of one hour, or thirty days when "remember me" is ticked,
//! and sets the token in an `HttpOnly` `access_token` cookie scoped to the
//! admin path. A token that no longer resolves is simply anonymous.

pub(crate) mod init;
pub(crate) mod login;
mod middleware;
pub(crate) mod password;
mod payload;
mod provider;
mod session;
mod state;
mod utils;

pub use middleware::CurrentAdmin;
pub use provider::UsernamePasswordProvider;
pub use session::{ACCESS_TOKEN_COOKIE, REMEMBER_ME_COOKIE};
pub use state::{AuthConfig, AuthState};
pub use utils::{Argon2Hasher, CryptoError, PasswordHasher};

#[cfg(test)]
mod tests;
