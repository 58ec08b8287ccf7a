//! Snippet persistence on top of a sqlx SQLite pool.
//!
//! The store owns the `snippets` table. Visibility is decided inside SQL
//! (`expires > datetime('now')`), so the database clock is the only clock that
//! matters for expiry. Expired rows are never deleted; they simply stop
//! appearing in query results.
//!
//! All statements use bound parameters. User input is never interpolated into
//! query text.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::debug;
use url::form_urlencoded;

mod error;
mod schema;

pub use error::{BoxedError, StoreError};

/// A stored snippet, as returned by [`SnippetStore::get`] and
/// [`SnippetStore::latest`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// Data-access layer for snippets.
///
/// Cheap to clone: the pool is reference-counted internally and safe to share
/// across concurrent requests.
///
/// # Examples
///
/// ```no_run
/// use snippetbox::store::SnippetStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SnippetStore::connect("sqlite::memory:").await?;
/// store.bootstrap().await?;
///
/// let id = store.insert("Hello", "World", 1).await?;
/// let snippet = store.get(id).await?;
/// assert_eq!(snippet.title, "Hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SnippetStore {
    pool: SqlitePool,
}

impl SnippetStore {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `dsn` and verify it answers.
    ///
    /// Accepts any sqlx SQLite URL, e.g. `sqlite://snippetbox.db` or
    /// `sqlite::memory:`. Missing database files are created.
    ///
    /// An in-memory database (`sqlite::memory:` or `?mode=memory`) lives inside
    /// a single connection, so the pool is pinned to exactly one connection
    /// that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the URL is invalid or the first
    /// connection cannot be established.
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(dsn)
            .map_err(|e| StoreError::connection("invalid SQLite connection string", e))?
            .create_if_missing(true);

        let pool_options = if is_in_memory(dsn) {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(5) // SQLite is single-writer
                .acquire_timeout(Duration::from_secs(30))
                .idle_timeout(Duration::from_secs(600))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::connection("failed to open SQLite pool", e))?;

        let store = Self::new(pool);
        store.ping().await?;
        Ok(store)
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new snippet that expires `expiry_days` days from now.
    ///
    /// Both `created` and `expires` are computed by the database.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidExpiry` for a zero-day window, which would
    /// never be visible, and `StoreError::Query` if the write fails.
    pub async fn insert(
        &self,
        title: &str,
        content: &str,
        expiry_days: u32,
    ) -> Result<i64, StoreError> {
        if expiry_days == 0 {
            return Err(StoreError::InvalidExpiry { days: expiry_days });
        }
        let modifier = format!("+{expiry_days} days");

        let result = sqlx::query(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES (?1, ?2, datetime('now'), datetime('now', ?3))
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(modifier)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::query("failed to insert snippet", e))?;

        let id = result.last_insert_rowid();
        debug!(id, expiry_days, "snippet inserted");
        Ok(id)
    }

    /// Fetch one unexpired snippet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id or the row has
    /// expired, `StoreError::Query` on any other failure.
    pub async fn get(&self, id: i64) -> Result<Snippet, StoreError> {
        sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > datetime('now') AND id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::query("failed to get snippet", e))?
        .ok_or(StoreError::NotFound { id })
    }

    /// Up to `limit` unexpired snippets, newest first.
    ///
    /// Ids are assigned monotonically, so ordering by id descending is
    /// ordering by creation.
    pub async fn latest(&self, limit: u32) -> Result<Vec<Snippet>, StoreError> {
        sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > datetime('now')
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::query("failed to list latest snippets", e))
    }

    /// Round-trip a trivial statement. Used by the readiness probe.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::connection("database did not answer", e))?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Whether `dsn` names an in-memory SQLite database.
fn is_in_memory(dsn: &str) -> bool {
    let (path, params) = dsn.split_once('?').unwrap_or((dsn, ""));
    path.ends_with(":memory:")
        || form_urlencoded::parse(params.as_bytes()).any(|(k, v)| k == "mode" && v == "memory")
}
