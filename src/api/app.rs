//! Admin application wiring: site context, providers, and the final router.

use axum::{routing::get, Extension, Router};
use std::sync::Arc;

use crate::api::handlers::{auth::UsernamePasswordProvider, health, home};
use crate::api::resources::{Resource, ResourceRegistry};
use crate::store::{AccountStore, SessionStore};

const DEFAULT_ADMIN_PATH: &str = "/admin";
const DEFAULT_TITLE: &str = "Admin";

/// A pluggable authentication strategy.
///
/// `register` adds the provider's routes. Once every provider has registered,
/// `layer` wraps the complete admin router, so middleware applied there covers
/// admin pages and every provider's routes regardless of registration order.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self, router: Router, site: &AdminSite) -> Router;

    fn layer(&self, router: Router, _site: &AdminSite) -> Router {
        router
    }
}

/// Account navigation published by the active login provider for the admin
/// pages.
#[derive(Clone, Debug)]
pub struct AccountLinks {
    pub password_url: String,
    pub logout_url: String,
}

/// Shared, read-only context handed to providers and admin handlers.
#[derive(Clone)]
pub struct AdminSite {
    admin_path: String,
    title: String,
    resources: Arc<ResourceRegistry>,
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
}

impl AdminSite {
    /// Admin mount point without a trailing slash; empty when mounted at `/`.
    #[must_use]
    pub fn admin_path(&self) -> &str {
        &self.admin_path
    }

    /// URL of the admin home page.
    #[must_use]
    pub fn home_url(&self) -> &str {
        if self.admin_path.is_empty() {
            "/"
        } else {
            &self.admin_path
        }
    }

    /// Cookie `Path` attribute scoping the session to the admin.
    #[must_use]
    pub fn cookie_path(&self) -> &str {
        self.home_url()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    #[must_use]
    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }
}

/// Normalize a mount point to `/segment[/segment...]`, or empty for the root.
fn normalize_admin_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Configuration for one admin panel, owned by the host application.
pub struct AdminApp {
    admin_path: String,
    title: String,
    resources: ResourceRegistry,
    providers: Vec<Box<dyn Provider>>,
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
}

impl AdminApp {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            admin_path: DEFAULT_ADMIN_PATH.to_string(),
            title: DEFAULT_TITLE.to_string(),
            resources: ResourceRegistry::new(),
            providers: Vec::new(),
            accounts,
            sessions,
        }
    }

    #[must_use]
    pub fn with_admin_path(mut self, path: &str) -> Self {
        self.admin_path = normalize_admin_path(path);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: String) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl Provider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.register(resource);
        self
    }

    pub fn register_resource(&mut self, resource: Resource) {
        self.resources.register(resource);
    }

    #[must_use]
    pub fn admin_path(&self) -> &str {
        &self.admin_path
    }

    /// Build the router: admin pages and provider routes under the admin
    /// path, `/health` at the root.
    ///
    /// Without an explicit provider, the username/password provider with
    /// default settings is used.
    #[must_use]
    pub fn router(self) -> Router {
        let site = AdminSite {
            admin_path: self.admin_path,
            title: self.title,
            resources: Arc::new(self.resources),
            accounts: self.accounts,
            sessions: self.sessions,
        };

        let mut providers = self.providers;
        if providers.is_empty() {
            providers.push(Box::new(UsernamePasswordProvider::default()));
        }

        let mut admin = Router::new().route("/", get(home::home));
        for provider in &providers {
            tracing::debug!("Registering provider {}", provider.name());
            admin = provider.register(admin, &site);
        }
        for provider in &providers {
            admin = provider.layer(admin, &site);
        }
        let admin = admin.layer(Extension(site.clone()));

        let root = Router::new().route("/health", get(health::health));
        if site.admin_path().is_empty() {
            root.merge(admin)
        } else {
            root.nest(site.admin_path(), admin)
        }
    }
}
