//! Postgres-backed account and session stores.
//!
//! Tables are defined in `sql/schema.sql`. Sessions carry an `expires_at`
//! column; every read filters on it so an expired row is indistinguishable
//! from a missing one, and [`PgSessionStore::purge_expired`] reclaims space.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use super::{Account, AccountStore, SessionStore, StoreError};

pub const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

fn query_span(operation: &'static str, statement: &'static str) -> tracing::Span {
    tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = operation,
        db.statement = statement
    )
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

/// Apply `sql/schema.sql`, one statement at a time.
///
/// # Errors
/// Returns an error if any statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in split_sql_statements(SCHEMA_SQL) {
        sqlx::query(&statement).execute(pool).await?;
    }
    Ok(())
}

/// Splits a schema file on statement-terminating semicolons, skipping `--` comments.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

#[derive(Clone, Debug)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
    })
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let query = "SELECT id, username, password_hash FROM admin_accounts WHERE username = $1";
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await?;
        Ok(row.as_ref().map(account_from_row).transpose()?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let query = "SELECT id, username, password_hash FROM admin_accounts WHERE id = $1";
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await?;
        Ok(row.as_ref().map(account_from_row).transpose()?)
    }

    async fn any_exists(&self) -> Result<bool, StoreError> {
        let query = "SELECT EXISTS (SELECT 1 FROM admin_accounts) AS present";
        let row = sqlx::query(query)
            .fetch_one(&self.pool)
            .instrument(query_span("SELECT", query))
            .await?;
        Ok(row.try_get("present")?)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Account, StoreError> {
        let query = r"
            INSERT INTO admin_accounts (id, username, password_hash)
            VALUES ($1, $2, $3)
        ";
        let id = Uuid::new_v4();
        let result = sqlx::query(query)
            .bind(id)
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .instrument(query_span("INSERT", query))
            .await;

        match result {
            Ok(_) => Ok(Account {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
            }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(username.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn create_first(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<Account>, StoreError> {
        // The table lock serializes concurrent first-run inserts.
        let lock = "LOCK TABLE admin_accounts IN SHARE ROW EXCLUSIVE MODE";
        let query = r"
            INSERT INTO admin_accounts (id, username, password_hash)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM admin_accounts)
        ";
        let id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;
        sqlx::query(lock)
            .execute(&mut *tx)
            .instrument(query_span("LOCK", lock))
            .await?;
        let result = sqlx::query(query)
            .bind(id)
            .bind(username)
            .bind(password_hash)
            .execute(&mut *tx)
            .instrument(query_span("INSERT", query))
            .await?;
        tx.commit().await?;

        Ok((result.rows_affected() == 1).then(|| Account {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        }))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        let query = "UPDATE admin_accounts SET password_hash = $2, updated_at = NOW() WHERE id = $1";
        sqlx::query(query)
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .instrument(query_span("UPDATE", query))
            .await?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete rows whose expiry has passed. Returns the number removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let query = "DELETE FROM admin_sessions WHERE expires_at <= NOW()";
        let result = sqlx::query(query)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn set(&self, key: &str, account_id: Uuid, ttl: Duration) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO admin_sessions (session_key, account_id, expires_at)
            VALUES ($1, $2, NOW() + make_interval(secs => $3))
            ON CONFLICT (session_key)
            DO UPDATE SET account_id = EXCLUDED.account_id, expires_at = EXCLUDED.expires_at
        ";
        sqlx::query(query)
            .bind(key)
            .bind(account_id)
            .bind(ttl.as_secs_f64())
            .execute(&self.pool)
            .instrument(query_span("INSERT", query))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Uuid>, StoreError> {
        let query =
            "SELECT account_id FROM admin_sessions WHERE session_key = $1 AND expires_at > NOW()";
        let row = sqlx::query(query)
            .bind(key)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await?;
        Ok(row.map(|row| row.try_get("account_id")).transpose()?)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let query = "DELETE FROM admin_sessions WHERE session_key = $1";
        sqlx::query(query)
            .bind(key)
            .execute(&self.pool)
            .instrument(query_span("DELETE", query))
            .await?;
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        let query = r"
            SELECT EXTRACT(EPOCH FROM (expires_at - NOW()))::float8 AS remaining
            FROM admin_sessions
            WHERE session_key = $1 AND expires_at > NOW()
        ";
        let row = sqlx::query(query)
            .bind(key)
            .fetch_optional(&self.pool)
            .instrument(query_span("SELECT", query))
            .await?;
        let remaining: Option<f64> = row.map(|row| row.try_get("remaining")).transpose()?;
        Ok(remaining.map(|secs| Duration::from_secs_f64(secs.max(0.0))))
    }
}
