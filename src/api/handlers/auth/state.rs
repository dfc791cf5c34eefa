//! Auth configuration and shared handler state.

use std::sync::Arc;
use std::time::Duration;

use super::utils::{Argon2Hasher, PasswordHasher};
use crate::api::app::{AccountLinks, AdminSite};
use crate::store::{AccountStore, SessionStore};

const DEFAULT_SESSION_TTL_SECONDS: u64 = 60 * 60;
const DEFAULT_REMEMBER_ME_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;
const MAX_SESSION_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
const DEFAULT_SESSION_PREFIX: &str = "gatehouse:login_user";
const DEFAULT_LOGIN_TITLE: &str = "Login to your account";

#[derive(Clone, Debug)]
pub struct AuthConfig {
    login_path: String,
    logout_path: String,
    init_path: String,
    password_path: String,
    public_paths: Vec<String>,
    username_field_name: String,
    login_title: String,
    login_logo_url: Option<String>,
    session_prefix: String,
    session_ttl_seconds: u64,
    remember_me_ttl_seconds: u64,
    secure_cookies: bool,
    hasher: Arc<dyn PasswordHasher>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            login_path: "/login".to_string(),
            logout_path: "/logout".to_string(),
            init_path: "/init".to_string(),
            password_path: "/password".to_string(),
            public_paths: Vec::new(),
            username_field_name: "username".to_string(),
            login_title: DEFAULT_LOGIN_TITLE.to_string(),
            login_logo_url: None,
            session_prefix: DEFAULT_SESSION_PREFIX.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            remember_me_ttl_seconds: DEFAULT_REMEMBER_ME_TTL_SECONDS,
            secure_cookies: false,
            hasher: Arc::new(Argon2Hasher),
        }
    }

    #[must_use]
    pub fn with_login_path(mut self, path: &str) -> Self {
        self.login_path = path.to_string();
        self
    }

    #[must_use]
    pub fn with_logout_path(mut self, path: &str) -> Self {
        self.logout_path = path.to_string();
        self
    }

    #[must_use]
    pub fn with_init_path(mut self, path: &str) -> Self {
        self.init_path = path.to_string();
        self
    }

    #[must_use]
    pub fn with_password_path(mut self, path: &str) -> Self {
        self.password_path = path.to_string();
        self
    }

    /// Replace the argon2 default, e.g. to verify hashes migrated from
    /// another system.
    #[must_use]
    pub fn with_password_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Extra paths, relative to the admin root, reachable without a session.
    ///
    /// The login and init paths are always public.
    #[must_use]
    pub fn with_public_path(mut self, path: &str) -> Self {
        self.public_paths.push(path.to_string());
        self
    }

    #[must_use]
    pub fn with_username_field_name(mut self, name: &str) -> Self {
        self.username_field_name = name.to_string();
        self
    }

    #[must_use]
    pub fn with_login_title(mut self, title: String) -> Self {
        self.login_title = title;
        self
    }

    #[must_use]
    pub fn with_login_logo_url(mut self, url: Option<String>) -> Self {
        self.login_logo_url = url;
        self
    }

    #[must_use]
    pub fn with_session_prefix(mut self, prefix: String) -> Self {
        self.session_prefix = prefix;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds.min(MAX_SESSION_TTL_SECONDS);
        self
    }

    #[must_use]
    pub fn with_remember_me_ttl_seconds(mut self, seconds: u64) -> Self {
        self.remember_me_ttl_seconds = seconds.min(MAX_SESSION_TTL_SECONDS);
        self
    }

    #[must_use]
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    #[must_use]
    pub fn logout_path(&self) -> &str {
        &self.logout_path
    }

    #[must_use]
    pub fn init_path(&self) -> &str {
        &self.init_path
    }

    #[must_use]
    pub fn password_path(&self) -> &str {
        &self.password_path
    }

    #[must_use]
    pub fn username_field_name(&self) -> &str {
        &self.username_field_name
    }

    #[must_use]
    pub fn login_title(&self) -> &str {
        &self.login_title
    }

    #[must_use]
    pub fn login_logo_url(&self) -> Option<&str> {
        self.login_logo_url.as_deref()
    }

    #[must_use]
    pub fn session_prefix(&self) -> &str {
        &self.session_prefix
    }

    /// Session lifetime: the remember-me TTL when requested, else the default.
    #[must_use]
    pub fn session_ttl(&self, remember_me: bool) -> Duration {
        if remember_me {
            Duration::from_secs(self.remember_me_ttl_seconds)
        } else {
            Duration::from_secs(self.session_ttl_seconds)
        }
    }

    pub(super) fn hasher(&self) -> &dyn PasswordHasher {
        self.hasher.as_ref()
    }

    pub(super) fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    /// Whether a path relative to the admin root skips the session requirement.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        path == self.login_path
            || path == self.init_path
            || self.public_paths.iter().any(|public| public == path)
    }
}

pub struct AuthState {
    config: AuthConfig,
    site: AdminSite,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, site: AdminSite) -> Self {
        Self { config, site }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn site(&self) -> &AdminSite {
        &self.site
    }

    pub(super) fn accounts(&self) -> &Arc<dyn AccountStore> {
        self.site.accounts()
    }

    pub(super) fn sessions(&self) -> &Arc<dyn SessionStore> {
        self.site.sessions()
    }

    /// Absolute URL of the login page.
    pub(super) fn login_url(&self) -> String {
        format!("{}{}", self.site.admin_path(), self.config.login_path)
    }

    /// Absolute URL of any auth page.
    pub(super) fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.site.admin_path(), path)
    }

    pub(super) fn account_links(&self) -> AccountLinks {
        AccountLinks {
            password_url: self.url_for(self.config.password_path()),
            logout_url: self.url_for(self.config.logout_path()),
        }
    }
}
