//! Handler trait and type erasure.
//!
//! # Two shapes of handler
//!
//! Most routes need the application state (the snippet store), a few do not.
//! The router accepts both:
//!
//! ```text
//! async fn liveness(req: Request) -> Response            ← stateless
//! async fn home(app: Arc<App>, req: Request) -> Response ← wrapped in WithState
//! ```
//!
//! Either way the router ends up holding the same thing, a [`BoxedHandler`]:
//!
//! ```text
//! WithState::new(Arc::clone(&app), handlers::home)
//!        ↓ router.on(Method::Get, "/", handler)
//! handler.into_boxed_handler()                    ← Handler impl
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)  at request time              ← one vtable dispatch
//!        ↓
//! Box::pin(home(Arc::clone(&app), req))           ← BoxFuture
//! ```
//!
//! Per request that is one `Arc` clone of the state plus one virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` because it appears in the signature of the public
/// [`Handler`] trait.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Satisfied by any `async fn(Request) -> Response` (or closure of that
/// shape) and by [`WithState`]. Sealed: nothing else can implement it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Stateless handlers ────────────────────────────────────────────────────────

impl<F, Fut> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete `Fn(Request)` to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        Box::pin((self.0)(req))
    }
}

// ── Stateful handlers ─────────────────────────────────────────────────────────

/// A handler that receives shared state `S` alongside each request.
pub struct WithState<S, F> {
    state: Arc<S>,
    f: F,
}

impl<S, F, Fut> WithState<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    pub fn new(state: Arc<S>, f: F) -> Self {
        Self { state, f }
    }
}

impl<S, F> private::Sealed for WithState<S, F> {}

impl<S, F, Fut> Handler for WithState<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl<S, F, Fut> ErasedHandler for WithState<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        Box::pin((self.f)(Arc::clone(&self.state), req))
    }
}
