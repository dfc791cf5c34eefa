//! Router-level tests for the username/password provider.
//!
//! Each test builds the full admin router over in-memory stores and drives it
//! with `oneshot`, then inspects the stores directly.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Method, Request, StatusCode,
    },
    response::{Html, Response},
    routing::get,
    Router,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use super::{Argon2Hasher, AuthConfig, CryptoError, PasswordHasher, UsernamePasswordProvider};
use crate::api::{AdminApp, AdminSite, Provider, Resource};
use crate::store::{
    Account, AccountStore, MemoryAccountStore, MemorySessionStore, SessionStore, StoreError,
};

const PREFIX: &str = "gatehouse:login_user";

struct TestApp {
    router: Router,
    accounts: Arc<MemoryAccountStore>,
    sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    fn new() -> Self {
        Self::with_admin_path("/admin")
    }

    fn with_admin_path(admin_path: &str) -> Self {
        let accounts = Arc::new(MemoryAccountStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let router = AdminApp::new(accounts.clone(), sessions.clone())
            .with_admin_path(admin_path)
            .with_title("Test Admin".to_string())
            .with_resource(Resource::model("Users", "user"))
            .with_provider(UsernamePasswordProvider::new(AuthConfig::new()))
            .router();
        Self {
            router,
            accounts,
            sessions,
        }
    }

    async fn with_account(username: &str, password: &str) -> Result<(Self, Account)> {
        let app = Self::new();
        let hash = Argon2Hasher.hash(&SecretString::from(password))?;
        let account = app.accounts.create(username, &hash).await?;
        Ok((app, account))
    }

    async fn send(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> Result<Response> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("access_token={token}"));
        }
        self.send(builder.body(Body::empty())?).await
    }

    async fn post_form(&self, uri: &str, body: &str, token: Option<&str>) -> Result<Response> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("access_token={token}"));
        }
        self.send(builder.body(Body::from(body.to_string()))?).await
    }

    async fn post_json(&self, uri: &str, body: &serde_json::Value) -> Result<Response> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?;
        self.send(request).await
    }

    /// Log in through the form and return the issued token.
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        let response = self
            .post_form(
                "/admin/login",
                &format!("username={username}&password={password}"),
                None,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        access_token(&response).context("login did not set access_token")
    }
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect()
}

fn access_token(response: &Response) -> Option<String> {
    set_cookies(response).iter().find_map(|cookie| {
        let value = cookie.strip_prefix("access_token=")?;
        let token = value.split(';').next()?.trim();
        (!token.is_empty()).then(|| token.to_string())
    })
}

async fn body_text(response: Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn key(token: &str) -> String {
    format!("{PREFIX}:{token}")
}

#[tokio::test]
async fn anonymous_requests_redirect_to_login() -> Result<()> {
    let app = TestApp::new();

    let response = app.get("/admin", None).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));

    let response = app.get("/admin/password", Some("bogus")).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));

    let response = app.get("/admin/login", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await?.contains("name=\"username\""));
    Ok(())
}

#[tokio::test]
async fn health_is_outside_the_admin() -> Result<()> {
    let app = TestApp::new();
    let response = app.get("/health", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_success_sets_cookie_and_one_hour_session() -> Result<()> {
    let (app, account) = TestApp::with_account("alice", "secret1").await?;

    let response = app
        .post_json(
            "/admin/login",
            &json!({"username": "alice", "password": "secret1"}),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));

    let cookies = set_cookies(&response);
    let session_cookie = cookies
        .iter()
        .find(|cookie| cookie.starts_with("access_token="))
        .context("missing access_token cookie")?;
    assert!(session_cookie.contains("HttpOnly"));
    assert!(session_cookie.contains("Path=/admin"));
    assert!(session_cookie.contains("Max-Age=3600"));
    assert!(cookies
        .iter()
        .any(|cookie| cookie.starts_with("remember_me=;") && cookie.contains("Max-Age=0")));

    let token = access_token(&response).context("missing token")?;
    assert_eq!(app.sessions.get(&key(&token)).await?, Some(account.id));
    let ttl = app.sessions.ttl(&key(&token)).await?.unwrap_or_default();
    assert!(ttl > Duration::from_secs(3590) && ttl <= Duration::from_secs(3600));
    Ok(())
}

#[tokio::test]
async fn login_wrong_password_is_401_without_side_effects() -> Result<()> {
    let (app, _) = TestApp::with_account("alice", "secret1").await?;

    let response = app
        .post_json(
            "/admin/login",
            &json!({"username": "alice", "password": "wrong"}),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    assert!(app.sessions.is_empty().await);
    assert!(body_text(response).await?.contains("Login failed"));
    Ok(())
}

#[tokio::test]
async fn login_unknown_or_incomplete_credentials_is_401() -> Result<()> {
    let (app, _) = TestApp::with_account("alice", "secret1").await?;

    for body in ["username=bob&password=secret1", "username=alice", "password=secret1", ""] {
        let response = app.post_form("/admin/login", body, None).await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "body: {body}");
    }
    assert!(app.sessions.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn login_case_folds_username() -> Result<()> {
    let (app, account) = TestApp::with_account("alice", "secret1").await?;
    let token = app.login("%20ALICE%20", "secret1").await?;
    assert_eq!(app.sessions.get(&key(&token)).await?, Some(account.id));
    Ok(())
}

#[tokio::test]
async fn remember_me_extends_session_to_thirty_days() -> Result<()> {
    let (app, _) = TestApp::with_account("alice", "secret1").await?;

    let response = app
        .post_form(
            "/admin/login",
            "username=alice&password=secret1&remember_me=on",
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(set_cookies(&response)
        .iter()
        .any(|cookie| cookie.starts_with("remember_me=on")));
    assert!(set_cookies(&response)
        .iter()
        .any(|cookie| cookie.starts_with("access_token=") && cookie.contains("Max-Age=2592000")));

    let token = access_token(&response).context("missing token")?;
    let ttl = app.sessions.ttl(&key(&token)).await?.unwrap_or_default();
    assert!(ttl > Duration::from_secs(29 * 24 * 3600));
    assert!(ttl > AuthConfig::new().session_ttl(false));
    Ok(())
}

#[tokio::test]
async fn authenticated_admin_reaches_home_and_skips_login() -> Result<()> {
    let (app, _) = TestApp::with_account("alice", "secret1").await?;
    let token = app.login("alice", "secret1").await?;

    let response = app.get("/admin", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await?;
    assert!(html.contains("alice"));
    assert!(html.contains("Users"));
    assert!(html.contains("Test Admin"));

    let response = app.get("/admin/login", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
    Ok(())
}

#[tokio::test]
async fn logout_invalidates_token() -> Result<()> {
    let (app, _) = TestApp::with_account("alice", "secret1").await?;
    let token = app.login("alice", "secret1").await?;

    let response = app.get("/admin/logout", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    assert!(set_cookies(&response)
        .iter()
        .any(|cookie| cookie.starts_with("access_token=;") && cookie.contains("Max-Age=0")));
    assert_eq!(app.sessions.get(&key(&token)).await?, None);

    let response = app.get("/admin", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));

    // A fresh login issues a different token.
    let fresh = app.login("alice", "secret1").await?;
    assert_ne!(fresh, token);
    assert_eq!(app.sessions.get(&key(&token)).await?, None);
    Ok(())
}

#[tokio::test]
async fn expired_or_dangling_sessions_are_anonymous() -> Result<()> {
    let (app, account) = TestApp::with_account("alice", "secret1").await?;

    app.sessions
        .set(&key("short"), account.id, Duration::from_millis(10))
        .await?;
    app.sessions
        .set(&key("dangling"), Uuid::new_v4(), Duration::from_secs(60))
        .await?;
    tokio::time::sleep(Duration::from_millis(30)).await;

    for token in ["short", "dangling"] {
        let response = app.get("/admin", Some(token)).await?;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "token: {token}");
        assert_eq!(location(&response), Some("/admin/login"));
    }
    Ok(())
}

#[tokio::test]
async fn init_creates_first_account_once() -> Result<()> {
    let app = TestApp::new();

    let response = app.get("/admin/init", None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_form(
            "/admin/init",
            "username=Root&password=secret1&confirm_password=secret2",
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await?.contains("different"));
    assert!(!app.accounts.any_exists().await?);

    let response = app
        .post_form(
            "/admin/init",
            "username=Root&password=secret1&confirm_password=secret1",
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    let root = app
        .accounts
        .find_by_username("root")
        .await?
        .context("init did not create the account")?;
    assert_ne!(root.password_hash, "secret1");

    // Single use from here on, whatever the input.
    let response = app.get("/admin/init", None).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));

    let response = app
        .post_form(
            "/admin/init",
            "username=other&password=x&confirm_password=x",
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    assert_eq!(app.accounts.find_by_username("other").await?, None);

    app.login("root", "secret1").await?;
    Ok(())
}

#[tokio::test]
async fn init_rejects_empty_fields() -> Result<()> {
    let app = TestApp::new();
    for body in [
        "username=&password=a&confirm_password=a",
        "username=root&password=&confirm_password=",
    ] {
        let response = app.post_form("/admin/init", body, None).await?;
        assert_eq!(response.status(), StatusCode::OK, "body: {body}");
    }
    assert!(!app.accounts.any_exists().await?);
    Ok(())
}

#[tokio::test]
async fn password_change_failures_leave_account_unchanged() -> Result<()> {
    let (app, account) = TestApp::with_account("alice", "secret1").await?;
    let token = app.login("alice", "secret1").await?;

    let response = app.get("/admin/password", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    for (body, message) in [
        (
            "old_password=wrong&new_password=next1&re_new_password=next1",
            "Old password is incorrect",
        ),
        (
            "old_password=secret1&new_password=next1&re_new_password=next2",
            "different",
        ),
    ] {
        let response = app.post_form("/admin/password", body, Some(&token)).await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await?.contains(message));
    }

    let stored = app.accounts.find_by_id(account.id).await?;
    assert_eq!(stored.map(|a| a.password_hash), Some(account.password_hash));
    assert_eq!(app.sessions.get(&key(&token)).await?, Some(account.id));
    Ok(())
}

#[tokio::test]
async fn password_change_updates_hash_and_ends_session() -> Result<()> {
    let (app, account) = TestApp::with_account("alice", "secret1").await?;
    let token = app.login("alice", "secret1").await?;

    let response = app
        .post_form(
            "/admin/password",
            "old_password=secret1&new_password=next1&re_new_password=next1",
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    assert_eq!(app.sessions.get(&key(&token)).await?, None);

    let stored = app.accounts.find_by_id(account.id).await?;
    assert_ne!(stored.map(|a| a.password_hash), Some(account.password_hash));

    let response = app.get("/admin", Some(&token)).await?;
    assert_eq!(location(&response), Some("/admin/login"));

    let response = app
        .post_form("/admin/login", "username=alice&password=secret1", None)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    app.login("alice", "next1").await?;
    Ok(())
}

#[tokio::test]
async fn admin_mounted_at_root() -> Result<()> {
    let app = TestApp::with_admin_path("/");

    let response = app.get("/", None).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let response = app.get("/init", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn custom_username_field_and_public_path() -> Result<()> {
    let accounts = Arc::new(MemoryAccountStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let hash = Argon2Hasher.hash(&SecretString::from("secret1"))?;
    let account = accounts.create("alice@example.com", &hash).await?;

    let config = AuthConfig::new()
        .with_username_field_name("email")
        .with_public_path("/")
        .with_session_prefix("panel".to_string());
    let router = AdminApp::new(accounts.clone(), sessions.clone())
        .with_admin_path("/panel")
        .with_provider(UsernamePasswordProvider::new(config))
        .router();

    let response = router
        .clone()
        .oneshot(Request::builder().uri("/panel").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/panel/login")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("email=alice%40example.com&password=secret1"))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/panel"));
    let token = access_token(&response).context("missing token")?;
    assert_eq!(
        sessions.get(&format!("panel:{token}")).await?,
        Some(account.id)
    );
    Ok(())
}

/// Session store whose deletes always fail.
struct FailingDelete(Arc<MemorySessionStore>);

#[async_trait]
impl SessionStore for FailingDelete {
    async fn set(&self, key: &str, account_id: Uuid, ttl: Duration) -> Result<(), StoreError> {
        self.0.set(key, account_id, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<Uuid>, StoreError> {
        self.0.get(key).await
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        self.0.ttl(key).await
    }
}

/// Account store with a slow existence check, so concurrent requests overlap.
struct SlowExistsCheck(Arc<MemoryAccountStore>);

#[async_trait]
impl AccountStore for SlowExistsCheck {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.0.find_by_username(username).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        self.0.find_by_id(id).await
    }

    async fn any_exists(&self) -> Result<bool, StoreError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.0.any_exists().await
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Account, StoreError> {
        self.0.create(username, password_hash).await
    }

    async fn create_first(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError> {
        self.0.create_first(username, password_hash).await
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        self.0.update_password(id, password_hash).await
    }
}

/// Adds a page after the login provider has registered.
struct ReportsProvider;

impl Provider for ReportsProvider {
    fn name(&self) -> &'static str {
        "reports"
    }

    fn register(&self, router: Router, _site: &AdminSite) -> Router {
        router.route("/reports", get(|| async { Html("reports") }))
    }
}

/// Stores the reversed password; enough to tell it apart from argon2.
#[derive(Debug)]
struct ReversedHasher;

impl PasswordHasher for ReversedHasher {
    fn hash(&self, password: &SecretString) -> Result<String, CryptoError> {
        Ok(format!(
            "rev:{}",
            password.expose_secret().chars().rev().collect::<String>()
        ))
    }

    fn verify(&self, password: &SecretString, hash: &str) -> bool {
        self.hash(password).is_ok_and(|candidate| candidate == hash)
    }
}

#[tokio::test]
async fn routes_from_later_providers_require_a_session() -> Result<()> {
    let accounts = Arc::new(MemoryAccountStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let hash = Argon2Hasher.hash(&SecretString::from("secret1"))?;
    accounts.create("alice", &hash).await?;
    let router = AdminApp::new(accounts.clone(), sessions.clone())
        .with_provider(UsernamePasswordProvider::default())
        .with_provider(ReportsProvider)
        .router();
    let app = TestApp {
        router,
        accounts,
        sessions,
    };

    let response = app.get("/admin/reports", None).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));

    let token = app.login("alice", "secret1").await?;
    let response = app.get("/admin/reports", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await?, "reports");
    Ok(())
}

#[tokio::test]
async fn password_change_fails_when_session_cannot_be_removed() -> Result<()> {
    let accounts = Arc::new(MemoryAccountStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let hash = Argon2Hasher.hash(&SecretString::from("secret1"))?;
    let account = accounts.create("alice", &hash).await?;
    let router =
        AdminApp::new(accounts.clone(), Arc::new(FailingDelete(sessions.clone()))).router();
    let app = TestApp {
        router,
        accounts,
        sessions,
    };
    let token = app.login("alice", "secret1").await?;

    let response = app
        .post_form(
            "/admin/password",
            "old_password=secret1&new_password=next1&re_new_password=next1",
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let stored = app.accounts.find_by_id(account.id).await?;
    assert_eq!(stored.map(|a| a.password_hash), Some(account.password_hash));

    // Logout still clears the cookie when the store delete fails.
    let response = app.get("/admin/logout", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    assert!(set_cookies(&response)
        .iter()
        .any(|cookie| cookie.starts_with("access_token=;")));
    Ok(())
}

#[tokio::test]
async fn concurrent_init_creates_a_single_account() -> Result<()> {
    let accounts = Arc::new(MemoryAccountStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let router =
        AdminApp::new(Arc::new(SlowExistsCheck(accounts.clone())), sessions.clone()).router();
    let app = Arc::new(TestApp {
        router,
        accounts,
        sessions,
    });

    let submit = |username: &'static str| {
        let app = app.clone();
        tokio::spawn(async move {
            let body = format!("username={username}&password=pw&confirm_password=pw");
            app.post_form("/admin/init", &body, None)
                .await
                .map(|response| response.status())
        })
    };
    let (first, second) = (submit("a"), submit("b"));
    assert_eq!(first.await??, StatusCode::SEE_OTHER);
    assert_eq!(second.await??, StatusCode::SEE_OTHER);

    let a = app.accounts.find_by_username("a").await?.is_some();
    let b = app.accounts.find_by_username("b").await?.is_some();
    assert!(a ^ b, "exactly one account expected, got a={a} b={b}");
    Ok(())
}

#[tokio::test]
async fn custom_auth_paths_drive_routes_and_home_links() -> Result<()> {
    let accounts = Arc::new(MemoryAccountStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let hash = Argon2Hasher.hash(&SecretString::from("secret1"))?;
    accounts.create("alice", &hash).await?;
    let config = AuthConfig::new()
        .with_logout_path("/signout")
        .with_password_path("/account/password");
    let router = AdminApp::new(accounts.clone(), sessions.clone())
        .with_provider(UsernamePasswordProvider::new(config))
        .router();
    let app = TestApp {
        router,
        accounts,
        sessions,
    };
    let token = app.login("alice", "secret1").await?;

    let response = app.get("/admin", Some(&token)).await?;
    let html = body_text(response).await?;
    assert!(html.contains("href=\"/admin/signout\""));
    assert!(html.contains("href=\"/admin/account/password\""));

    let response = app.get("/admin/account/password", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/admin/signout", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));
    assert_eq!(app.sessions.get(&key(&token)).await?, None);
    Ok(())
}

#[tokio::test]
async fn custom_password_hasher_is_used_for_init_and_login() -> Result<()> {
    let accounts = Arc::new(MemoryAccountStore::new());
    let sessions = Arc::new(MemorySessionStore::new());
    let config = AuthConfig::new().with_password_hasher(ReversedHasher);
    let router = AdminApp::new(accounts.clone(), sessions.clone())
        .with_provider(UsernamePasswordProvider::new(config))
        .router();
    let app = TestApp {
        router,
        accounts,
        sessions,
    };

    let response = app
        .post_form(
            "/admin/init",
            "username=root&password=secret1&confirm_password=secret1",
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let root = app.accounts.find_by_username("root").await?;
    assert_eq!(
        root.map(|account| account.password_hash),
        Some("rev:1terces".to_string())
    );

    app.login("root", "secret1").await?;
    Ok(())
}
