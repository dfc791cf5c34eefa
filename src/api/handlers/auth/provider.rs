use axum::{middleware, routing::get, Extension, Router};
use std::sync::Arc;

use super::{init, login, middleware::authenticate, password, state::AuthConfig, AuthState};
use crate::api::app::{AdminSite, Provider};

/// Username/password login backed by the site's account and session stores.
#[derive(Clone, Debug, Default)]
pub struct UsernamePasswordProvider {
    config: AuthConfig,
}

impl UsernamePasswordProvider {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn state(&self, site: &AdminSite) -> Arc<AuthState> {
        Arc::new(AuthState::new(self.config.clone(), site.clone()))
    }
}

impl Provider for UsernamePasswordProvider {
    fn name(&self) -> &'static str {
        "login_provider"
    }

    fn register(&self, router: Router, _site: &AdminSite) -> Router {
        let config = &self.config;
        router
            .route(config.login_path(), get(login::login_view).post(login::login))
            .route(config.logout_path(), get(login::logout))
            .route(config.init_path(), get(init::init_view).post(init::init))
            .route(
                config.password_path(),
                get(password::password_view).post(password::password),
            )
    }

    /// Session middleware over the whole admin router, including routes
    /// added by providers registered after this one.
    fn layer(&self, router: Router, site: &AdminSite) -> Router {
        let state = self.state(site);
        router
            .layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .layer(Extension(state.account_links()))
            .layer(Extension(state))
    }
}
