//! HTTP status codes the application answers with.
//!
//! Use [`Status`] anywhere a status code is accepted:
//!
//! ```rust
//! use snippetbox::{Response, Status};
//!
//! // plain-text body holding the reason phrase
//! Response::error(Status::NotFound);
//!
//! // custom body
//! Response::builder().status(Status::UnprocessableContent).text("title: This field cannot be blank");
//! ```

use http::StatusCode;

/// A response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                            // 200

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    SeeOther,                      // 303

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,                    // 400
    NotFound,                      // 404
    MethodNotAllowed,              // 405
    UnprocessableContent,          // 422

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,           // 500
    ServiceUnavailable,            // 503
}

impl Status {
    pub fn code(self) -> StatusCode {
        match self {
            Self::Ok                   => StatusCode::OK,
            Self::SeeOther             => StatusCode::SEE_OTHER,
            Self::BadRequest           => StatusCode::BAD_REQUEST,
            Self::NotFound             => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed     => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnprocessableContent => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalServerError  => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable   => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Canonical reason phrase, used as the body of generic error responses.
    pub fn reason(self) -> &'static str {
        self.code().canonical_reason().unwrap_or("")
    }
}

impl From<Status> for StatusCode {
    fn from(s: Status) -> Self {
        s.code()
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.code().as_u16()
    }
}
