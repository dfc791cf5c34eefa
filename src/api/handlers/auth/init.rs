//! First-run bootstrap: create the initial admin account.
//!
//! Single use. Once any account exists both endpoints redirect to login,
//! whatever the input.

use axum::{
    extract::Extension,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    payload::FormFields,
    state::AuthState,
    utils::normalize_username,
};
use crate::api::{error::AppError, views};

fn render_init(state: &AuthState, error: Option<&str>) -> Response {
    let action = state.url_for(state.config().init_path());
    views::init_page(&action, state.config().username_field_name(), error).into_response()
}

#[utoipa::path(
    get,
    path = "/admin/init",
    responses(
        (status = 200, description = "First-run form", content_type = "text/html", body = String),
        (status = 303, description = "An account already exists; redirect to login")
    ),
    tag = "auth"
)]
pub async fn init_view(Extension(state): Extension<Arc<AuthState>>) -> Result<Response, AppError> {
    if state.accounts().any_exists().await? {
        return Ok(Redirect::to(&state.login_url()).into_response());
    }
    Ok(render_init(&state, None))
}

#[utoipa::path(
    post,
    path = "/admin/init",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "`username`, `password`, `confirm_password`"
    ),
    responses(
        (status = 200, description = "Validation error", content_type = "text/html", body = String),
        (status = 303, description = "Account created, or one already existed; redirect to login")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn init(
    Extension(state): Extension<Arc<AuthState>>,
    fields: FormFields,
) -> Result<Response, AppError> {
    if state.accounts().any_exists().await? {
        return Ok(Redirect::to(&state.login_url()).into_response());
    }

    let username = fields
        .get(state.config().username_field_name())
        .map(normalize_username)
        .unwrap_or_default();
    if username.is_empty() {
        return Ok(render_init(&state, Some("Username is required")));
    }

    let Some(password) = fields
        .secret("password")
        .filter(|password| !password.expose_secret().is_empty())
    else {
        return Ok(render_init(&state, Some("Password is required")));
    };
    if fields.get("confirm_password") != fields.get("password") {
        return Ok(render_init(
            &state,
            Some("Password and confirmation are different"),
        ));
    }

    let hash = state.config().hasher().hash(&password)?;
    match state.accounts().create_first(&username, &hash).await? {
        Some(account) => info!(account_id = %account.id, "Created initial admin account"),
        None => debug!("Initial account already created by a concurrent request"),
    }

    Ok(Redirect::to(&state.login_url()).into_response())
}
