//! Session resolution and redirect rules for every admin request.
//!
//! Flow Overview: read the `access_token` cookie, resolve it through the
//! session store to an account, attach the result as [`CurrentAdmin`], then
//! decide between redirecting and calling the handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::{session::extract_session_token, state::AuthState, utils::session_key};
use crate::api::error::AppError;
use crate::store::Account;

/// The account behind the current request, if the session resolved.
#[derive(Clone, Debug, Default)]
pub struct CurrentAdmin(pub Option<Account>);

impl CurrentAdmin {
    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        self.0.as_ref()
    }
}

/// Resolve a session token to an account.
///
/// Unknown, expired, or dangling tokens resolve to `None`; only store
/// failures are errors.
pub(super) async fn resolve_account(
    state: &AuthState,
    token: &str,
) -> Result<Option<Account>, AppError> {
    let key = session_key(state.config().session_prefix(), token);
    let Some(account_id) = state.sessions().get(&key).await? else {
        return Ok(None);
    };
    Ok(state.accounts().find_by_id(account_id).await?)
}

pub(super) async fn authenticate(
    State(state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let account = match extract_session_token(request.headers()) {
        Some(token) => resolve_account(&state, &token).await?,
        None => None,
    };

    let path = request.uri().path().to_string();
    let config = state.config();

    if account.is_some() && path == config.login_path() {
        return Ok(Redirect::to(state.site().home_url()).into_response());
    }

    if account.is_none() && !config.is_public(&path) {
        debug!("Anonymous request to {path}, redirecting to login");
        return Ok(Redirect::to(&state.login_url()).into_response());
    }

    request.extensions_mut().insert(CurrentAdmin(account));
    Ok(next.run(request).await)
}
