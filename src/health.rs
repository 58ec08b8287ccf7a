//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can it serve traffic? Failure → pulled from load-balancer. |

use tracing::warn;

use crate::store::SnippetStore;
use crate::{Request, Response, Status};

/// Liveness probe. Always `200 ok`; it has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe. `200 ready` while the database answers, `503` otherwise.
pub async fn readiness(store: &SnippetStore) -> Response {
    match store.ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::error(Status::ServiceUnavailable)
        }
    }
}
