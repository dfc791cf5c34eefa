//! Password change for the signed-in admin.

use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    login::{delete_session, logged_out},
    middleware::CurrentAdmin,
    payload::FormFields,
    state::AuthState,
};
use crate::api::{error::AppError, views};
use crate::store::Account;

fn render_password(state: &AuthState, account: &Account, error: Option<&str>) -> Response {
    let action = state.url_for(state.config().password_path());
    views::password_page(&action, &account.username, error).into_response()
}

#[utoipa::path(
    get,
    path = "/admin/password",
    responses(
        (status = 200, description = "Password change form", content_type = "text/html", body = String),
        (status = 303, description = "No session; redirect to login")
    ),
    tag = "auth"
)]
pub async fn password_view(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(current): Extension<CurrentAdmin>,
) -> Response {
    match current.account() {
        Some(account) => render_password(&state, account, None),
        None => Redirect::to(&state.login_url()).into_response(),
    }
}

/// Verify the old password and the confirmation, end the current session,
/// then store the new hash so the admin signs in again.
#[utoipa::path(
    post,
    path = "/admin/password",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "`old_password`, `new_password`, `re_new_password`"
    ),
    responses(
        (status = 200, description = "Validation error; password unchanged", content_type = "text/html", body = String),
        (status = 303, description = "Password changed and session ended; redirect to login")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn password(
    Extension(state): Extension<Arc<AuthState>>,
    Extension(current): Extension<CurrentAdmin>,
    headers: HeaderMap,
    fields: FormFields,
) -> Result<Response, AppError> {
    let Some(account) = current.account() else {
        return Ok(Redirect::to(&state.login_url()).into_response());
    };

    let hasher = state.config().hasher();
    let old_ok = fields
        .secret("old_password")
        .is_some_and(|old| hasher.verify(&old, &account.password_hash));
    if !old_ok {
        return Ok(render_password(
            &state,
            account,
            Some("Old password is incorrect"),
        ));
    }

    let Some(new_password) = fields
        .secret("new_password")
        .filter(|password| !password.expose_secret().is_empty())
    else {
        return Ok(render_password(&state, account, Some("New password is required")));
    };
    if fields.get("new_password") != fields.get("re_new_password") {
        return Ok(render_password(
            &state,
            account,
            Some("New password and confirmation are different"),
        ));
    }

    let hash = hasher.hash(&new_password)?;
    // The current session goes first: if it cannot be removed, the password
    // stays as it was and the request fails.
    delete_session(&state, &headers).await?;
    state.accounts().update_password(account.id, &hash).await?;
    info!(account_id = %account.id, "Admin password changed");

    Ok(logged_out(&state))
}
