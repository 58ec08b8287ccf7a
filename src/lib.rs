//! # snippetbox
//!
//! Create and view short-lived text snippets over HTTP.
//!
//! A snippet has a title, some content and an expiry window in days. It is
//! stored in SQLite and served back by id until it expires; expired snippets
//! stay on disk but disappear from every page.
//!
//! The crate has two layers:
//!
//! - [`store`]: the `snippets` table and its queries, over a sqlx pool
//! - [`app`]: request handlers and HTML views, on top of a small hyper-based
//!   HTTP core ([`Router`], [`Server`], [`Request`], [`Response`])
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snippetbox::{App, Server, store::SnippetStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), snippetbox::Error> {
//!     let store = SnippetStore::connect("sqlite://snippetbox.db").await?;
//!     store.bootstrap().await?;
//!
//!     let app = Arc::new(App::new(store));
//!     Server::bind("127.0.0.1:4000")?.serve(app.routes()).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod app;
pub mod config;
pub mod health;
pub mod store;

pub use app::App;
pub use config::Config;
pub use error::Error;
pub use handler::{Handler, WithState};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, Response};
pub use router::Router;
pub use server::{Server, shutdown_signal};
pub use status::Status;
