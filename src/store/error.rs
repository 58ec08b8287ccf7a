//! Store error types

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed error for wrapping driver-specific errors
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Snippet store errors
///
/// `NotFound` covers both missing and expired rows. `InvalidExpiry` rejects
/// input before it reaches the database. Every other variant is an underlying
/// failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No unexpired snippet with this id
    #[error("no matching snippet with id {id}")]
    NotFound { id: i64 },

    /// Expiry window that would make the snippet invisible immediately
    #[error("expiry must be at least one day, got {days}")]
    InvalidExpiry { days: u32 },

    /// Connection or pool failure
    #[error("connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Statement execution or row decoding failure
    #[error("query failed: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },

    /// Schema bootstrap failure
    #[error("schema setup failed: {message}")]
    Migration {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },
}

impl StoreError {
    /// Create a connection error with source
    pub fn connection(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a query error with source
    pub fn query(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Query {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a migration error with source
    pub fn migration(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Migration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
