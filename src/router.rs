//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that matches under
//! some other method answers `405` with an `Allow` header; a path that matches
//! nowhere answers `404`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Paths are matched exactly; the query string is not part of the match.
    ///
    /// ```rust,no_run
    /// # use snippetbox::{Method, Request, Response, Router};
    /// # async fn home(_: Request) -> Response { Response::text("") }
    /// # async fn create(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/",               home)
    ///     .on(Method::Post, "/snippet/create", create);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an earlier route for
    /// the same method. Routes are fixed at startup, so this is a programming
    /// error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Routes one request and produces one response.
    pub async fn respond(&self, req: Request) -> Response {
        let method = Method::try_from(req.method()).ok();

        if let Some(handler) = method.and_then(|m| self.lookup(m, req.path())) {
            return handler.call(req).await;
        }

        let allowed = self.allowed(req.path());
        if allowed.is_empty() {
            return Response::error(Status::NotFound);
        }

        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
        Response::builder()
            .status(Status::MethodNotAllowed)
            .header("allow", &allow)
            .text(Status::MethodNotAllowed.reason())
    }

    fn lookup(&self, method: Method, path: &str) -> Option<BoxedHandler> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        Some(Arc::clone(matched.value))
    }

    /// Methods with a route matching `path`, sorted.
    fn allowed(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        methods.sort();
        methods
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
