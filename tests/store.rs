//! Snippet store tests against an isolated in-memory SQLite pool.
//!
//! ```bash
//! cargo test --test store
//! ```

use chrono::{Duration, Utc};
use snippetbox::store::{SnippetStore, StoreError};
use sqlx::sqlite::SqlitePoolOptions;

/// Create a bootstrapped in-memory store for one test
async fn create_store() -> SnippetStore {
    let store = SnippetStore::connect("sqlite::memory:")
        .await
        .expect("failed to create in-memory store");
    store.bootstrap().await.expect("failed to bootstrap schema");
    store
}

/// Push a snippet's expiry into the past, as if its window had elapsed
async fn expire(store: &SnippetStore, id: i64) {
    sqlx::query("UPDATE snippets SET expires = datetime('now', '-1 second') WHERE id = ?1")
        .bind(id)
        .execute(store.pool())
        .await
        .expect("failed to expire snippet");
}

async fn row_count(store: &SnippetStore, id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM snippets WHERE id = ?1")
        .bind(id)
        .fetch_one(store.pool())
        .await
        .expect("count failed")
}

// ============================================================================
// insert / get
// ============================================================================

#[tokio::test]
async fn insert_then_get_round_trips() {
    let store = create_store().await;
    let before = Utc::now() - Duration::seconds(2);

    let id = store.insert("Hello", "World", 1).await.unwrap();
    assert_eq!(id, 1);

    let snippet = store.get(id).await.unwrap();
    assert_eq!(snippet.id, id);
    assert_eq!(snippet.title, "Hello");
    assert_eq!(snippet.content, "World");
    assert!(snippet.created >= before);
    assert!(snippet.created <= Utc::now() + Duration::seconds(2));
    assert_eq!(snippet.expires - snippet.created, Duration::days(1));
}

#[tokio::test]
async fn ids_are_assigned_monotonically() {
    let store = create_store().await;
    let a = store.insert("a", "a", 7).await.unwrap();
    let b = store.insert("b", "b", 7).await.unwrap();
    let c = store.insert("c", "c", 365).await.unwrap();
    assert!(a < b && b < c);
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let store = create_store().await;
    let err = store.get(42).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { id: 42 }));
}

#[tokio::test]
async fn expired_snippet_is_not_found_but_still_stored() {
    let store = create_store().await;
    let id = store.insert("Hello", "World", 1).await.unwrap();
    assert!(store.get(id).await.is_ok());

    expire(&store, id).await;

    let err = store.get(id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(row_count(&store, id).await, 1);
}

#[tokio::test]
async fn unicode_and_markup_are_stored_verbatim() {
    let store = create_store().await;
    let content = "古池や\n蛙飛び込む\n<b>水の音</b> & 'quotes'";
    let id = store.insert("松尾芭蕉", content, 7).await.unwrap();

    let snippet = store.get(id).await.unwrap();
    assert_eq!(snippet.title, "松尾芭蕉");
    assert_eq!(snippet.content, content);
}

#[tokio::test]
async fn zero_day_expiry_is_rejected() {
    let store = create_store().await;
    let err = store.insert("t", "c", 0).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidExpiry { days: 0 }));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM snippets")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// ============================================================================
// latest
// ============================================================================

#[tokio::test]
async fn latest_on_empty_table_is_empty() {
    let store = create_store().await;
    assert!(store.latest(20).await.unwrap().is_empty());
}

#[tokio::test]
async fn latest_is_limited_and_newest_first() {
    let store = create_store().await;
    for i in 0..5 {
        store.insert(&format!("snippet {i}"), "body", 7).await.unwrap();
    }

    let latest = store.latest(3).await.unwrap();
    let ids: Vec<i64> = latest.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![5, 4, 3]);
}

#[tokio::test]
async fn latest_skips_expired_snippets() {
    let store = create_store().await;
    let a = store.insert("a", "a", 7).await.unwrap();
    let b = store.insert("b", "b", 7).await.unwrap();
    let c = store.insert("c", "c", 7).await.unwrap();
    expire(&store, b).await;

    let ids: Vec<i64> = store.latest(20).await.unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![c, a]);

    let now = Utc::now();
    assert!(store.latest(20).await.unwrap().iter().all(|s| s.expires > now));
}

#[tokio::test]
async fn latest_on_fully_expired_table_is_empty() {
    let store = create_store().await;
    let a = store.insert("a", "a", 1).await.unwrap();
    let b = store.insert("b", "b", 1).await.unwrap();
    expire(&store, a).await;
    expire(&store, b).await;

    assert!(store.latest(20).await.unwrap().is_empty());
}

#[tokio::test]
async fn latest_with_zero_limit_is_empty() {
    let store = create_store().await;
    store.insert("a", "a", 1).await.unwrap();
    assert!(store.latest(0).await.unwrap().is_empty());
}

// ============================================================================
// Bootstrap and failures
// ============================================================================

#[tokio::test]
async fn bootstrap_is_repeatable() {
    let store = create_store().await;
    store.bootstrap().await.unwrap();
    store.create_snippet_table().await.unwrap();
    assert!(matches!(
        store.create_snippet_index().await,
        Err(StoreError::Migration { .. })
    ));
}

#[tokio::test]
async fn injected_pool_is_used() {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SnippetStore::new(pool.clone());
    store.bootstrap().await.unwrap();

    let id = store.insert("Hello", "World", 1).await.unwrap();
    let title: String = sqlx::query_scalar("SELECT title FROM snippets WHERE id = ?1")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(title, "Hello");
}

#[tokio::test]
async fn queries_without_schema_are_query_errors() {
    let store = SnippetStore::connect("sqlite::memory:").await.unwrap();

    assert!(matches!(store.get(1).await, Err(StoreError::Query { .. })));
    assert!(matches!(store.latest(1).await, Err(StoreError::Query { .. })));
    assert!(matches!(store.insert("t", "c", 1).await, Err(StoreError::Query { .. })));
}

#[tokio::test]
async fn mode_memory_dsn_shares_one_database() {
    let store = SnippetStore::connect("sqlite:file:snippets?mode=memory").await.unwrap();
    store.bootstrap().await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..5 {
        let store = store.clone();
        tasks.spawn(async move { store.insert(&format!("t{i}"), "c", 7).await });
    }
    while let Some(res) = tasks.join_next().await {
        res.unwrap().unwrap();
    }
    assert_eq!(store.latest(20).await.unwrap().len(), 5);
}

#[tokio::test]
async fn unopenable_database_is_connection_error() {
    let err = SnippetStore::connect("sqlite:///nonexistent-dir/nested/snippetbox.db").await.unwrap_err();
    assert!(matches!(err, StoreError::Connection { .. }));
}

#[tokio::test]
async fn concurrent_inserts_get_distinct_ids() {
    let store = create_store().await;

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..10 {
        let store = store.clone();
        tasks.spawn(async move { store.insert(&format!("t{i}"), "c", 7).await.unwrap() });
    }

    let mut ids = Vec::new();
    while let Some(id) = tasks.join_next().await {
        ids.push(id.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
}
