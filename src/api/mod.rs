use crate::{
    cli::actions::{Backend, ServerArgs},
    store::{
        postgres::apply_schema, AccountStore, MemoryAccountStore, MemorySessionStore,
        PgAccountStore, PgSessionStore, SessionStore,
    },
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    Router,
};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod app;
pub(crate) mod error;
pub mod handlers;
pub mod openapi;
pub mod resources;
pub(crate) mod views;

pub use app::{AccountLinks, AdminApp, AdminSite, Provider};
pub use openapi::openapi;
pub use handlers::auth::{
    Argon2Hasher, AuthConfig, CurrentAdmin, PasswordHasher, UsernamePasswordProvider,
};
pub use resources::{Resource, ResourceRegistry};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(args: ServerArgs) -> Result<()> {
    let (accounts, sessions): (Arc<dyn AccountStore>, Arc<dyn SessionStore>) = match &args.backend
    {
        Backend::Postgres { dsn } => {
            // Connect to database
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn.expose_secret())
                .await
                .context("Failed to connect to database")?;

            apply_schema(&pool)
                .await
                .context("Failed to apply database schema")?;

            let sessions = PgSessionStore::new(pool.clone());
            spawn_session_purge(sessions.clone());

            (Arc::new(PgAccountStore::new(pool)), Arc::new(sessions))
        }
        Backend::Memory => {
            info!("Using in-memory stores; accounts and sessions are lost on exit");
            (
                Arc::new(MemoryAccountStore::new()),
                Arc::new(MemorySessionStore::new()),
            )
        }
    };

    let auth_config = AuthConfig::new()
        .with_session_prefix(args.session_prefix.clone())
        .with_secure_cookies(args.secure_cookies)
        .with_login_title(args.login_title.clone())
        .with_login_logo_url(args.logo_url.clone());

    let admin = AdminApp::new(accounts, sessions)
        .with_admin_path(&args.admin_path)
        .with_provider(UsernamePasswordProvider::new(auth_config));
    let admin_path = admin.admin_path().to_string();

    let app = with_http_layers(admin.router());

    let listener = TcpListener::bind(format!("::0:{}", args.port)).await?;

    info!("Listening on [::]:{}, admin at {}/", args.port, admin_path);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {err}");
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Request id, propagation, and tracing layers around the whole app.
pub fn with_http_layers(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    )
}

fn spawn_session_purge(sessions: PgSessionStore) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => info!("Purged {removed} expired sessions"),
                Err(err) => error!("Failed to purge expired sessions: {err}"),
            }
        }
    });
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
