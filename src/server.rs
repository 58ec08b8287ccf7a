//! HTTP server and graceful shutdown.
//!
//! One tokio task per connection; hyper's `auto` builder speaks HTTP/1.1 and
//! HTTP/2, whichever the client negotiates. Every request body is buffered
//! before dispatch.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Immediately stops `listener.accept()`, so no new connections are made.
//! 2. Tells every open connection to finish its in-flight request and close;
//!    idle keep-alive connections close at once.
//! 3. Waits up to [`DRAIN_TIMEOUT`] for them, then aborts the stragglers.
//! 4. Returns from [`Server::serve`], which lets `main` close the database
//!    pool and exit cleanly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// How long shutdown waits for in-flight requests before aborting them.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if `addr` is not a valid `host:port`
    /// string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use snippetbox::Server;
    /// assert!(Server::bind("127.0.0.1:4000").is_ok());
    /// assert!(Server::bind("localhost").is_err());
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        let addr: SocketAddr = addr.parse().map_err(|_| Error::InvalidAddress(addr.to_owned()))?;
        Ok(Self { addr })
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but stops when `shutdown` resolves.
    pub async fn serve_with_shutdown<S>(self, router: Router, shutdown: S) -> Result<(), Error>
    where
        S: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr).await?;
        serve_listener(listener, router, shutdown).await
    }
}

/// Accept loop over an already bound listener.
pub(crate) async fn serve_listener<S>(
    listener: TcpListener,
    router: Router,
    shutdown: S,
) -> Result<(), Error>
where
    S: std::future::Future<Output = ()>,
{
    let router = Arc::new(router);
    let builder = ConnBuilder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();

    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "snippetbox listening");

    let mut tasks = tokio::task::JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // Shutdown is checked first so a SIGTERM stops accepting new
            // connections even if more are queued.
            biased;

            () = &mut shutdown => {
                info!(open = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let router = Arc::clone(&router);
                let svc = service_fn(move |req| {
                    let router = Arc::clone(&router);
                    async move { dispatch(router, req, remote_addr).await }
                });

                let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tasks.spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished connection tasks so the JoinSet does not grow
            // without bound.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    drop(listener);

    tokio::select! {
        () = graceful.shutdown() => {
            while tasks.join_next().await.is_some() {}
        }
        () = tokio::time::sleep(DRAIN_TIMEOUT) => {
            warn!(aborted = tasks.len(), "drain timed out, aborting connections");
            tasks.shutdown().await;
        }
    }

    info!("snippetbox stopped");
    Ok(())
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Buffers the body, routes the request and logs the outcome.
///
/// Never fails: every problem becomes a status code.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let response = match body.collect().await {
        Ok(collected) => {
            let req = Request::new(parts.method, parts.uri, parts.headers, collected.to_bytes());
            router.respond(req).await
        }
        Err(e) => {
            warn!(peer = %remote_addr, "failed to read request body: {e}");
            Response::error(Status::BadRequest)
        }
    };

    let status = u16::from(response.status_code());
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
    if status >= 500 {
        warn!(peer = %remote_addr, %method, %path, status, latency_ms, "request failed");
    } else {
        debug!(peer = %remote_addr, %method, %path, status, latency_ms, "request served");
    }

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// On Windows only Ctrl-C is available. A signal handler that cannot be
/// installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
