//! Integration tests for the SQLite response store

use std::collections::BTreeMap;
use tattfq_common::db::{init_database, RatingKind, ResponseMeta, ResponseStore};

async fn setup_store() -> (ResponseStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pool = init_database(&dir.path().join("tattfq.db"))
        .await
        .expect("init database");
    (ResponseStore::new(pool), dir)
}

fn ratings(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
    pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

fn meta_for_platform(platform: &str) -> ResponseMeta {
    ResponseMeta {
        platform: platform.to_string(),
        ..ResponseMeta::default()
    }
}

#[tokio::test]
async fn test_append_then_load_roundtrip() {
    let (store, _dir) = setup_store().await;

    store
        .append(
            "TATTFQ-ABCDEF1234",
            &meta_for_platform("Halodoc"),
            &ratings(&[("DSI1", 5), ("DSI2", 3)]),
            &ratings(&[("DSI1", 6), ("DSI2", 4)]),
        )
        .await
        .expect("append");

    let loaded = store.load_all(100).await.expect("load");
    assert_eq!(loaded.len(), 1);

    let response = &loaded[0];
    assert_eq!(response.respondent_code, "TATTFQ-ABCDEF1234");
    assert_eq!(response.meta.platform, "Halodoc");
    assert_eq!(response.rating(RatingKind::Performance, "DSI1"), Some(5.0));
    assert_eq!(response.rating(RatingKind::Importance, "DSI2"), Some(4.0));
    assert_eq!(response.rating(RatingKind::Performance, "DSI3"), None);
}

#[tokio::test]
async fn test_load_all_is_newest_first_and_bounded() {
    let (store, _dir) = setup_store().await;

    for i in 0..5 {
        store
            .append(
                &format!("TATTFQ-000000000{}", i),
                &ResponseMeta::default(),
                &ratings(&[("DSI1", 1)]),
                &ratings(&[("DSI1", 1)]),
            )
            .await
            .expect("append");
    }

    let loaded = store.load_all(100).await.expect("load");
    assert_eq!(loaded.len(), 5);
    // Same created_at second is possible; the id tiebreaker keeps newest first
    let ids: Vec<i64> = loaded.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);

    let bounded = store.load_all(2).await.expect("load bounded");
    assert_eq!(bounded.len(), 2);
    assert_eq!(bounded[0].id, 5);
}

#[tokio::test]
async fn test_clear_all_empties_store_and_restarts_ids() {
    let (store, _dir) = setup_store().await;

    store
        .append(
            "TATTFQ-AAAAAAAAAA",
            &ResponseMeta::default(),
            &ratings(&[("DSI1", 2)]),
            &ratings(&[("DSI1", 2)]),
        )
        .await
        .expect("append");
    assert_eq!(store.count().await.expect("count"), 1);

    store.clear_all().await.expect("clear");
    assert_eq!(store.count().await.expect("count"), 0);
    assert!(store.load_all(10).await.expect("load").is_empty());

    store
        .append(
            "TATTFQ-BBBBBBBBBB",
            &ResponseMeta::default(),
            &ratings(&[("DSI1", 3)]),
            &ratings(&[("DSI1", 3)]),
        )
        .await
        .expect("append after clear");
    let loaded = store.load_all(10).await.expect("load");
    assert_eq!(loaded[0].id, 1);
}

#[tokio::test]
async fn test_malformed_json_columns_decode_to_empty() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pool = init_database(&dir.path().join("tattfq.db"))
        .await
        .expect("init database");

    sqlx::query(
        "INSERT INTO responses (created_at, respondent_code, meta, performance, importance)
         VALUES ('2025-01-01T00:00:00+00:00', 'TATTFQ-CCCCCCCCCC', 'not json', '{broken', '[]')",
    )
    .execute(&pool)
    .await
    .expect("insert raw row");

    let store = ResponseStore::new(pool);
    let loaded = store.load_all(10).await.expect("load survives bad row");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].meta, ResponseMeta::default());
    assert!(loaded[0].performance.is_empty());
    assert!(loaded[0].importance.is_empty());
}

#[tokio::test]
async fn test_append_fails_on_closed_pool() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pool = init_database(&dir.path().join("tattfq.db"))
        .await
        .expect("init database");
    let store = ResponseStore::new(pool.clone());

    // Simulate a connectivity failure
    pool.close().await;

    let result = store
        .append(
            "TATTFQ-DDDDDDDDDD",
            &ResponseMeta::default(),
            &ratings(&[("DSI1", 1)]),
            &ratings(&[("DSI1", 1)]),
        )
        .await;
    assert!(result.is_err());
}
