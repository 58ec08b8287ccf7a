//! Unified error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors that stop the process: configuration, storage setup, or the
/// listener itself.
///
/// Request-level failures (404, 405, 500) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding to a port or accepting a connection failed
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The configured listen address is not a valid `host:port`
    #[error("invalid listen address `{0}`")]
    InvalidAddress(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
