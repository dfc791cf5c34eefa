//! Login and logout endpoints.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::{
    payload::FormFields,
    session::{
        clear_remember_me_cookie, clear_session_cookie, extract_session_token,
        remember_me_cookie, session_cookie,
    },
    state::AuthState,
    utils::{generate_session_token, normalize_username, session_key},
};
use crate::api::{
    error::AppError,
    views::{self, LoginView},
};
use crate::store::StoreError;

const LOGIN_FAILED: &str = "Login failed: wrong username or password";

fn render_login(state: &AuthState, error: Option<&str>) -> Html<String> {
    let config = state.config();
    let action = state.login_url();
    views::login_page(
        &LoginView {
            action: &action,
            title: config.login_title(),
            logo_url: config.login_logo_url(),
            username_field: config.username_field_name(),
        },
        error,
    )
}

#[utoipa::path(
    get,
    path = "/admin/login",
    responses(
        (status = 200, description = "Login form", content_type = "text/html", body = String),
        (status = 303, description = "Already signed in; redirect to the admin home")
    ),
    tag = "auth"
)]
pub async fn login_view(Extension(state): Extension<Arc<AuthState>>) -> impl IntoResponse {
    render_login(&state, None)
}

#[utoipa::path(
    post,
    path = "/admin/login",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "`username`, `password`, optional `remember_me=on`; JSON is accepted too"
    ),
    responses(
        (status = 303, description = "Signed in; `access_token` cookie set"),
        (status = 401, description = "Wrong username or password", content_type = "text/html", body = String)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    Extension(state): Extension<Arc<AuthState>>,
    fields: FormFields,
) -> Result<Response, AppError> {
    let config = state.config();
    let username = fields
        .get(config.username_field_name())
        .map(normalize_username)
        .unwrap_or_default();
    let remember_me = fields.checked("remember_me");

    let account = if username.is_empty() {
        None
    } else {
        state.accounts().find_by_username(&username).await?
    };

    let verified = match (&account, fields.secret("password")) {
        (Some(account), Some(password)) => {
            config.hasher().verify(&password, &account.password_hash)
        }
        _ => false,
    };

    let Some(account) = account.filter(|_| verified) else {
        debug!("Rejected login for {username:?}");
        return Ok((
            StatusCode::UNAUTHORIZED,
            render_login(&state, Some(LOGIN_FAILED)),
        )
            .into_response());
    };

    let ttl = config.session_ttl(remember_me);
    let token = generate_session_token()?;
    state
        .sessions()
        .set(&session_key(config.session_prefix(), &token), account.id, ttl)
        .await?;

    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, session_cookie(&state, &token, ttl)?);
    if remember_me {
        headers.append(SET_COOKIE, remember_me_cookie(ttl));
    } else {
        headers.append(SET_COOKIE, clear_remember_me_cookie());
    }

    info!(account_id = %account.id, remember_me, "Admin logged in");

    Ok((headers, Redirect::to(state.site().home_url())).into_response())
}

/// Remove the session entry behind the request's cookie, if any.
pub(super) async fn delete_session(
    state: &AuthState,
    request_headers: &HeaderMap,
) -> Result<(), StoreError> {
    match extract_session_token(request_headers) {
        Some(token) => {
            let key = session_key(state.config().session_prefix(), &token);
            state.sessions().delete(&key).await
        }
        None => Ok(()),
    }
}

/// Clear the cookie and send to login.
pub(super) fn logged_out(state: &AuthState) -> Response {
    let mut headers = HeaderMap::new();
    match clear_session_cookie(state) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build session cookie: {err}"),
    }
    (headers, Redirect::to(&state.login_url())).into_response()
}

#[utoipa::path(
    get,
    path = "/admin/logout",
    responses(
        (status = 303, description = "Session removed, cookie cleared; redirect to login")
    ),
    tag = "auth"
)]
pub async fn logout(
    Extension(state): Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Response {
    // The cookie is cleared even when the store delete fails.
    if let Err(err) = delete_session(&state, &headers).await {
        error!("Failed to delete session: {err}");
    }
    logged_out(&state)
}
