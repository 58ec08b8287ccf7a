//! Server-rendered HTML pages.
//!
//! Every page is the base layout wrapped around a page body, written as
//! `maud` markup. maud escapes every interpolated value, so snippet titles and
//! content can never inject markup.

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, html};

use crate::store::Snippet;

/// Home page: the latest snippets, newest first.
pub fn home(snippets: &[Snippet]) -> Markup {
    layout("Home", html! {
        h2 { "Latest Snippets" }
        @if snippets.is_empty() {
            p { "There's nothing to see here... yet!" }
        } @else {
            table {
                tr {
                    th { "Title" }
                    th { "Created" }
                    th { "ID" }
                }
                @for snippet in snippets {
                    tr {
                        td { a href=(view_path(snippet.id)) { (snippet.title) } }
                        td { (human_date(&snippet.created)) }
                        td { "#" (snippet.id) }
                    }
                }
            }
        }
    })
}

/// Detail page for one snippet.
pub fn view(snippet: &Snippet) -> Markup {
    layout(&format!("Snippet #{}", snippet.id), html! {
        div.snippet {
            div.metadata {
                strong { (snippet.title) }
                span { "#" (snippet.id) }
            }
            pre { code { (snippet.content) } }
            div.metadata {
                time { "Created: " (human_date(&snippet.created)) }
                time { "Expires: " (human_date(&snippet.expires)) }
            }
        }
    })
}

fn layout(title: &str, page: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " - Snippetbox" }
            }
            body {
                header { h1 { a href="/" { "Snippetbox" } } }
                nav { a href="/" { "Home" } }
                main { (page) }
                footer { "Powered by Rust" }
            }
        }
    }
}

fn view_path(id: i64) -> String {
    format!("/snippet/view?id={id}")
}

/// `02 Jan 2006 at 15:04`, in UTC.
pub fn human_date(t: &DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}
