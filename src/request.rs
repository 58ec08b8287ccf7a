//! Incoming HTTP request type.

use bytes::Bytes;
use http::{HeaderMap, Uri};
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    method: http::Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(method: http::Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self { method, uri, headers, body }
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }

    /// Case-insensitive header lookup. Non-UTF-8 values are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the first decoded value for `key` in the query string.
    ///
    /// `/snippet/view?id=7` → `req.query("id") == Some("7".into())`.
    pub fn query(&self, key: &str) -> Option<String> {
        let raw = self.uri.query()?;
        form_urlencoded::parse(raw.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Decodes an `application/x-www-form-urlencoded` body into key/value pairs.
    ///
    /// A body sent with any other content type (or none) is not a form and
    /// yields an empty list, as does an empty body.
    pub fn form(&self) -> Vec<(String, String)> {
        if !self.is_form() {
            return Vec::new();
        }
        form_urlencoded::parse(&self.body).into_owned().collect()
    }

    fn is_form(&self) -> bool {
        self.header("content-type")
            .and_then(|value| value.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
    }
}
