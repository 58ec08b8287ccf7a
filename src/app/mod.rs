//! The snippet web application: shared state plus its routing table.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`handlers::home`] |
//! | GET | `/snippet/view?id=N` | [`handlers::snippet_view`] |
//! | POST | `/snippet/create` | [`handlers::snippet_create`] |
//! | GET | `/healthz` | [`health::liveness`](crate::health::liveness) |
//! | GET | `/readyz` | [`health::readiness`](crate::health::readiness) |

use std::sync::Arc;

use crate::handler::WithState;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::router::Router;
use crate::store::SnippetStore;

pub mod handlers;
pub mod views;

/// State shared by every request.
pub struct App {
    pub(crate) store: SnippetStore,
}

impl App {
    pub fn new(store: SnippetStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SnippetStore {
        &self.store
    }

    /// The routing table for the application.
    pub fn routes(self: Arc<Self>) -> Router {
        Router::new()
            .on(Method::Get,  "/",               WithState::new(Arc::clone(&self), handlers::home))
            .on(Method::Get,  "/snippet/view",   WithState::new(Arc::clone(&self), handlers::snippet_view))
            .on(Method::Post, "/snippet/create", WithState::new(Arc::clone(&self), handlers::snippet_create))
            .on(Method::Get,  "/healthz",        health::liveness)
            .on(Method::Get,  "/readyz",         WithState::new(self, |app: Arc<App>, _req: Request| async move {
                health::readiness(app.store()).await
            }))
    }
}
