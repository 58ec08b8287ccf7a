//! Schema bootstrap for the `snippets` table.
//!
//! Table creation is idempotent. Index creation is not: `CREATE INDEX` on an
//! already-indexed table fails, and [`SnippetStore::bootstrap`] logs that
//! failure instead of propagating it.

use tracing::{info, warn};

use super::{SnippetStore, StoreError};

impl SnippetStore {
    /// Create the `snippets` table if it does not exist yet.
    pub async fn create_snippet_table(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snippets (
                id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(100) NOT NULL,
                content TEXT NOT NULL,
                created DATETIME NOT NULL,
                expires DATETIME NOT NULL
            )
            "#,
        )
        .execute(self.pool())
        .await
        .map_err(|e| StoreError::migration("failed to create snippets table", e))?;
        Ok(())
    }

    /// Create the index on `snippets(created)`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migration` if the index already exists.
    pub async fn create_snippet_index(&self) -> Result<(), StoreError> {
        sqlx::query("CREATE INDEX idx_snippets_created ON snippets(created)")
            .execute(self.pool())
            .await
            .map_err(|e| StoreError::migration("failed to create idx_snippets_created", e))?;
        Ok(())
    }

    /// Run all schema setup needed before serving traffic.
    ///
    /// # Errors
    ///
    /// Only a failed table creation is returned. A failed index creation is
    /// logged as a warning.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        self.create_snippet_table().await?;

        match self.create_snippet_index().await {
            Ok(()) => info!("snippet schema bootstrapped"),
            Err(e) => warn!(error = %e, "snippet index not created, continuing"),
        }
        Ok(())
    }
}
