//! Process configuration, read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `127.0.0.1` | listen address |
//! | `PORT` | `4000` | listen port |
//! | `DSN` | *(required)* | sqlx SQLite URL, e.g. `sqlite://snippetbox.db` |
//! | `ENV` | `prod` | `dev` or `prod` |

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    Missing(&'static str),

    #[error("PORT must be a number between 0 and 65535, got `{0}`")]
    InvalidPort(String),

    #[error("ENV must be `dev` or `prod`, got `{0}`")]
    InvalidEnvironment(String),
}

/// Deployment flavour. `Dev` only changes the default log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Dev,
    #[default]
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub dsn: String,
    pub env: Environment,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_owned());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 4000,
        };

        let dsn = get("DSN").ok_or(ConfigError::Missing("DSN"))?;

        let env = match get("ENV").as_deref() {
            None | Some("prod") => Environment::Prod,
            Some("dev") => Environment::Dev,
            Some(other) => return Err(ConfigError::InvalidEnvironment(other.to_owned())),
        };

        Ok(Self { host, port, dsn, env })
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        match self.env {
            Environment::Dev => "debug,sqlx=info,hyper=info",
            Environment::Prod => "info,snippetbox=debug",
        }
    }
}
