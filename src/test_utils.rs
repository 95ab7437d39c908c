use crate::*;
use crate::study::CardRelation;
use proptest::prelude::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use diesel::RunQueryDsl;
use std::sync::Arc;
use tower::ServiceExt;

/// Sets up a test database with migrations applied
///
/// This function:
/// 1. Creates a uniquely named shared in-memory SQLite database
/// 2. Opens the pool, which turns on foreign keys for every connection
/// 3. Runs all migrations to set up the schema
///
/// ### Returns
///
/// An Arc-wrapped database connection pool connected to the in-memory database
pub fn setup_test_db() -> Arc<db::DbPool> {
    // Plain ":memory:" gives each pooled connection its own database;
    // a named shared-cache URI makes them all see the same one.
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create test pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    Arc::new(pool)
}

/// Builds application state over a fresh test database
pub fn setup_test_state() -> AppState {
    AppState::new(setup_test_db(), auth::AuthKeys::new("test-secret", std::time::Duration::from_secs(3600)))
}

use diesel::sql_types::Text;
use diesel::QueryableByName;

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[tokio::test]
async fn test_setup_test_db() {
    let state = setup_test_state();
    let pool = state.pool.clone();

    let mut conn = pool.get().unwrap();
    let table_names: Vec<TableName> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
        .load(&mut conn)
        .expect("Failed to load table names");

    let expected_tables = vec![
        "users", "collections", "flash_cards", "collection_flash_cards",
        "__diesel_schema_migrations",
    ];

    for table in expected_tables {
        let exists = table_names.iter().any(|t| t.name == table);
        assert!(exists, "Table '{}' not found in database", table);

        let query = format!("SELECT COUNT(*) FROM {}", table);
        let result = diesel::sql_query(&query).execute(&mut conn);
        assert!(result.is_ok(), "Failed to query table '{}': {:?}", table, result.err());
    }

    drop(conn);

    let app = create_app(state);

    let request = Request::builder()
        .uri("/api/flashcards")
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Generates strings with leading/trailing whitespace, unicode and
/// punctuation mixed in
pub fn arb_messy_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,30}",
        "\\PC{0,30}",
        "[ \t]{0,3}[a-z]{1,10}[ \t]{0,3}",
    ]
}

/// Generates a raw priority the way it may arrive from storage or the wire
///
/// Mostly valid values, with absent, zero and out-of-range ones mixed in.
pub fn arb_raw_priority() -> impl Strategy<Value = Option<i32>> {
    prop_oneof![
        6 => (1i32..=5).prop_map(Some),
        1 => Just(None),
        1 => Just(Some(0)),
        1 => (-5i32..0).prop_map(Some),
        1 => (6i32..12).prop_map(Some),
    ]
}

/// Generates a list of relations with distinct card ids
pub fn arb_card_relations() -> impl Strategy<Value = Vec<CardRelation>> {
    prop::collection::vec((arb_messy_string(), any::<bool>(), arb_raw_priority()), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (text, is_learned, priority))| CardRelation {
                relation_id: format!("rel-{i}"),
                card_id: format!("card-{i}"),
                question: format!("{text}?"),
                answer: text,
                is_learned,
                priority,
            })
            .collect()
    })
}
