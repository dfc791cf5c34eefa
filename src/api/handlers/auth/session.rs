//! Session cookies: building, clearing, and reading them back.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use std::time::Duration;

use super::state::AuthState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REMEMBER_ME_COOKIE: &str = "remember_me";

/// Build the `HttpOnly` session cookie, scoped to the admin path.
pub(super) fn session_cookie(
    state: &AuthState,
    token: &str,
    ttl: Duration,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let path = state.site().cookie_path();
    let max_age = ttl.as_secs();
    let mut cookie =
        format!("{ACCESS_TOKEN_COOKIE}={token}; Path={path}; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if state.config().secure_cookies() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn clear_session_cookie(state: &AuthState) -> Result<HeaderValue, InvalidHeaderValue> {
    let path = state.site().cookie_path();
    let mut cookie =
        format!("{ACCESS_TOKEN_COOKIE}=; Path={path}; HttpOnly; SameSite=Lax; Max-Age=0");
    if state.config().secure_cookies() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Informational marker, readable by scripts; carries no secret.
pub(super) fn remember_me_cookie(ttl: Duration) -> HeaderValue {
    let max_age = ttl.as_secs();
    let cookie = format!("{REMEMBER_ME_COOKIE}=on; Path=/; SameSite=Lax; Max-Age={max_age}");
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static("remember_me=on"))
}

pub(super) fn clear_remember_me_cookie() -> HeaderValue {
    HeaderValue::from_static("remember_me=; Path=/; SameSite=Lax; Max-Age=0")
}

/// Read the session token from the `Cookie` header(s), if any.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, val) = pair.trim().split_once('=')?;
            (key.trim() == ACCESS_TOKEN_COOKIE).then(|| val.trim().to_string())
        })
        .find(|token| !token.is_empty())
}
