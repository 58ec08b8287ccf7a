//! Request handlers for the snippet pages.
//!
//! Each handler maps store outcomes to responses: `StoreError::NotFound`
//! becomes a 404, every other store error a generic 500 with the detail
//! logged server-side.

use std::error::Error as StdError;
use std::sync::Arc;

use tracing::{error, info};

use super::App;
use super::views;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;
use crate::store::StoreError;

/// Number of snippets shown on the home page.
pub const LATEST_LIMIT: u32 = 20;

/// Longest accepted title, matching the `VARCHAR(100)` column.
pub const MAX_TITLE_CHARS: usize = 100;

/// Expiry windows offered by the create form, in days.
pub const ALLOWED_EXPIRY_DAYS: [u32; 3] = [1, 7, 365];

/// `GET /`
pub async fn home(app: Arc<App>, req: Request) -> Response {
    match app.store.latest(LATEST_LIMIT).await {
        Ok(snippets) => Response::html(views::home(&snippets).into_string()),
        Err(e) => server_error(&req, &e),
    }
}

/// `GET /snippet/view?id=N`
///
/// Anything that is not a positive integer id is reported as not found.
pub async fn snippet_view(app: Arc<App>, req: Request) -> Response {
    let Some(id) = req.query("id").and_then(|raw| raw.parse::<i64>().ok()).filter(|id| *id >= 1)
    else {
        return Response::error(Status::NotFound);
    };

    match app.store.get(id).await {
        Ok(snippet) => Response::html(views::view(&snippet).into_string()),
        Err(StoreError::NotFound { .. }) => Response::error(Status::NotFound),
        Err(e) => server_error(&req, &e),
    }
}

/// `POST /snippet/create`
///
/// Other methods never reach this handler; the router answers them with
/// `405` and `Allow: POST`.
pub async fn snippet_create(app: Arc<App>, req: Request) -> Response {
    let form = match CreateForm::parse(&req.form()) {
        Ok(form) => form,
        Err(errors) => {
            let body = errors.iter()
                .map(|(field, msg)| format!("{field}: {msg}"))
                .collect::<Vec<_>>()
                .join("\n");
            return Response::builder().status(Status::UnprocessableContent).text(body);
        }
    };

    match app.store.insert(&form.title, &form.content, form.expires).await {
        Ok(id) => {
            info!(id, "snippet created");
            Response::see_other(&format!("/snippet/view?id={id}"))
        }
        Err(e) => server_error(&req, &e),
    }
}

/// Logs the full error chain and answers with a bare 500.
fn server_error(req: &Request, err: &(dyn StdError + 'static)) -> Response {
    error!(method = %req.method(), path = %req.path(), error = %error_chain(err), "server error");
    Response::error(Status::InternalServerError)
}

/// `outer: cause: root cause`
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// Validated input for a new snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub content: String,
    pub expires: u32,
}

impl Default for CreateForm {
    /// Values used when the request carries no form fields at all.
    fn default() -> Self {
        Self {
            title: "Test Title".to_owned(),
            content: "Test Content".to_owned(),
            expires: 7,
        }
    }
}

impl CreateForm {
    /// Binds and validates `title`, `content` and `expires`.
    ///
    /// An empty field list yields [`CreateForm::default`]. Otherwise every
    /// field is required; the error lists each failing field with a message.
    pub fn parse(fields: &[(String, String)]) -> Result<Self, Vec<(&'static str, &'static str)>> {
        if fields.is_empty() {
            return Ok(Self::default());
        }

        let value = |name: &str| {
            fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()).unwrap_or("")
        };
        let mut errors = Vec::new();

        let title = value("title");
        if title.trim().is_empty() {
            errors.push(("title", "This field cannot be blank"));
        } else if title.chars().count() > MAX_TITLE_CHARS {
            errors.push(("title", "This field cannot be more than 100 characters long"));
        }

        let content = value("content");
        if content.trim().is_empty() {
            errors.push(("content", "This field cannot be blank"));
        }

        let expires = value("expires").trim().parse::<u32>().ok()
            .filter(|days| ALLOWED_EXPIRY_DAYS.contains(days));
        if expires.is_none() {
            errors.push(("expires", "This field must equal 1, 7 or 365"));
        }

        match expires {
            Some(expires) if errors.is_empty() => Ok(Self {
                title: title.to_owned(),
                content: content.to_owned(),
                expires,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;
    use crate::store::SnippetStore;
    use bytes::Bytes;
    use http::HeaderMap;

    async fn setup() -> (SnippetStore, Router) {
        let store = SnippetStore::connect("sqlite::memory:").await.unwrap();
        store.bootstrap().await.unwrap();
        let router = Arc::new(App::new(store.clone())).routes();
        (store, router)
    }

    fn request(method: http::Method, uri: &str, body: &'static [u8]) -> Request {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/x-www-form-urlencoded".parse().unwrap());
        Request::new(method, uri.parse().unwrap(), headers, Bytes::from_static(body))
    }

    fn get(uri: &str) -> Request {
        Request::new(http::Method::GET, uri.parse().unwrap(), HeaderMap::new(), Bytes::new())
    }

    fn body(res: &Response) -> String {
        String::from_utf8(res.body().to_vec()).unwrap()
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn test_home_without_snippets() {
        let (_store, router) = setup().await;
        let res = router.respond(get("/")).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(body(&res).contains("There's nothing to see here... yet!"));
    }

    #[tokio::test]
    async fn test_home_lists_latest_first() {
        let (store, router) = setup().await;
        store.insert("older", "a", 7).await.unwrap();
        store.insert("newer", "b", 7).await.unwrap();

        let html = body(&router.respond(get("/")).await);
        assert!(html.find("newer").unwrap() < html.find("older").unwrap());
    }

    #[tokio::test]
    async fn test_unmatched_path_is_404() {
        let (_store, router) = setup().await;
        let res = router.respond(get("/missing")).await;
        assert_eq!(res.status_code(), Status::NotFound);
    }

    #[tokio::test]
    async fn test_view_existing_snippet() {
        let (store, router) = setup().await;
        let id = store.insert("Hello", "World", 1).await.unwrap();

        let res = router.respond(get(&format!("/snippet/view?id={id}"))).await;
        assert_eq!(res.status_code(), Status::Ok);
        let html = body(&res);
        assert!(html.contains("<strong>Hello</strong>"), "{html}");
        assert!(html.contains("<code>World</code>"));
    }

    #[tokio::test]
    async fn test_view_invalid_ids_are_404() {
        let (_store, router) = setup().await;
        for uri in ["/snippet/view?id=0", "/snippet/view?id=abc", "/snippet/view?id=-3", "/snippet/view"] {
            let res = router.respond(get(uri)).await;
            assert_eq!(res.status_code(), Status::NotFound, "{uri}");
            assert_eq!(body(&res), "Not Found");
        }
    }

    #[tokio::test]
    async fn test_view_unknown_and_expired_are_404() {
        let (store, router) = setup().await;
        let id = store.insert("Hello", "World", 1).await.unwrap();
        sqlx::query("UPDATE snippets SET expires = datetime('now', '-1 minute') WHERE id = ?1")
            .bind(id)
            .execute(store.pool())
            .await
            .unwrap();

        let res = router.respond(get(&format!("/snippet/view?id={id}"))).await;
        assert_eq!(res.status_code(), Status::NotFound);

        let res = router.respond(get("/snippet/view?id=999")).await;
        assert_eq!(res.status_code(), Status::NotFound);
    }

    #[tokio::test]
    async fn test_create_with_wrong_method_is_405() {
        let (_store, router) = setup().await;
        let res = router.respond(get("/snippet/create")).await;
        assert_eq!(res.status_code(), Status::MethodNotAllowed);
        assert_eq!(res.header("allow"), Some("POST"));
    }

    #[tokio::test]
    async fn test_create_without_form_uses_placeholder() {
        let (store, router) = setup().await;
        let res = router.respond(request(http::Method::POST, "/snippet/create", b"")).await;

        assert_eq!(res.status_code(), Status::SeeOther);
        assert_eq!(res.header("location"), Some("/snippet/view?id=1"));

        let snippet = store.get(1).await.unwrap();
        assert_eq!(snippet.title, "Test Title");
        assert_eq!(snippet.content, "Test Content");
    }

    #[tokio::test]
    async fn test_create_with_non_form_body_uses_placeholder() {
        let (store, router) = setup().await;
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let req = Request::new(
            http::Method::POST,
            "/snippet/create".parse().unwrap(),
            headers,
            Bytes::from_static(br#"{"title":"ignored"}"#),
        );

        let res = router.respond(req).await;
        assert_eq!(res.status_code(), Status::SeeOther);
        assert_eq!(store.get(1).await.unwrap().title, "Test Title");
    }

    #[tokio::test]
    async fn test_create_binds_form_fields() {
        let (store, router) = setup().await;
        let res = router
            .respond(request(
                http::Method::POST,
                "/snippet/create",
                b"title=O+snail&content=Climb+Mount+Fuji&expires=365",
            ))
            .await;

        assert_eq!(res.status_code(), Status::SeeOther);
        let snippet = store.get(1).await.unwrap();
        assert_eq!(snippet.title, "O snail");
        assert_eq!(snippet.content, "Climb Mount Fuji");
        assert_eq!((snippet.expires - snippet.created).num_days(), 365);
    }

    #[tokio::test]
    async fn test_create_with_invalid_form_is_422() {
        let (store, router) = setup().await;
        let res = router
            .respond(request(http::Method::POST, "/snippet/create", b"title=&content=x&expires=3"))
            .await;

        assert_eq!(res.status_code(), Status::UnprocessableContent);
        let text = body(&res);
        assert!(text.contains("title: This field cannot be blank"));
        assert!(text.contains("expires: This field must equal 1, 7 or 365"));
        assert!(store.latest(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let (store, router) = setup().await;
        store.close().await;

        for res in [
            router.respond(get("/")).await,
            router.respond(get("/snippet/view?id=1")).await,
            router.respond(request(http::Method::POST, "/snippet/create", b"")).await,
        ] {
            assert_eq!(res.status_code(), Status::InternalServerError);
            assert_eq!(body(&res), "Internal Server Error");
        }
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = StoreError::query("failed to get snippet", std::io::Error::other("disk I/O error"));
        assert_eq!(error_chain(&err), "query failed: failed to get snippet: disk I/O error");
        assert_eq!(error_chain(&StoreError::NotFound { id: 3 }), "no matching snippet with id 3");
    }

    #[test]
    fn test_form_title_length_limit() {
        let long = "x".repeat(MAX_TITLE_CHARS + 1);
        let errors = CreateForm::parse(&pairs(&[("title", &long), ("content", "c"), ("expires", "7")]))
            .unwrap_err();
        assert_eq!(errors, vec![("title", "This field cannot be more than 100 characters long")]);

        let exact = "x".repeat(MAX_TITLE_CHARS);
        assert!(CreateForm::parse(&pairs(&[("title", &exact), ("content", "c"), ("expires", "1")])).is_ok());
    }

    #[test]
    fn test_form_missing_fields() {
        let errors = CreateForm::parse(&pairs(&[("title", "t")])).unwrap_err();
        assert_eq!(errors, vec![
            ("content", "This field cannot be blank"),
            ("expires", "This field must equal 1, 7 or 365"),
        ]);
    }

    #[test]
    fn test_empty_form_is_placeholder() {
        assert_eq!(CreateForm::parse(&[]), Ok(CreateForm::default()));
    }
}
