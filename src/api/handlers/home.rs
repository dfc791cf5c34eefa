use axum::{
    extract::{Extension, Request},
    response::IntoResponse,
};

use super::auth::CurrentAdmin;
use crate::api::{
    app::{AccountLinks, AdminSite},
    views::{self, HomeView},
};

/// Admin landing page: signed-in user and registered resources.
///
/// Account links come from the login provider; without one the page renders
/// anonymously.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Admin home", content_type = "text/html", body = String),
        (status = 303, description = "No session; redirect to login")
    ),
    tag = "admin"
)]
pub async fn home(Extension(site): Extension<AdminSite>, request: Request) -> impl IntoResponse {
    let extensions = request.extensions();
    let username = extensions
        .get::<CurrentAdmin>()
        .and_then(CurrentAdmin::account)
        .map_or("", |account| account.username.as_str());
    let links = extensions.get::<AccountLinks>();

    views::home_page(&HomeView {
        title: site.title(),
        username,
        resources: site.resources().resources(),
        password_url: links.map(|links| links.password_url.as_str()),
        logout_url: links.map(|links| links.logout_url.as_str()),
    })
}
