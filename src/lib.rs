/// Flashdeck: A Flashcard Collection and Study Library
///
/// This library provides the core functionality for a flashcard study
/// application: users, collections of question/answer cards with per-card
/// priorities and learned flags, a REST API over them, and the study
/// session engine that turns a collection into a weighted, shuffled review
/// queue.
///
/// ### Modules
///
/// - `auth`: Session tokens, password hashing and the `AuthUser` extractor
/// - `config`: Layered configuration
/// - `db`: Database connection management
/// - `dto`: Request and response bodies
/// - `handlers`: HTTP handlers
/// - `models`: Data structures representing users, collections and cards
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `study`: Study queue builder and review state machine
///
/// ### Web API
///
/// All routes live under `/api`:
///
/// - `POST /register`, `POST /login`, `POST /logout`, `GET /me`
/// - `POST /collections`, `GET /collections`
/// - `GET|PATCH|DELETE /collections/{id}`
/// - `GET /public-collections`
/// - `POST|GET /collections/{id}/flashcards`
/// - `GET /collections/{id}/flashcards/public`
/// - `GET /collections/{id}/flashcards/search?text=`
/// - `POST|PUT|DELETE /collections/{id}/flashcards/{cardId}`
/// - `GET /flashcards`, `GET /flashcards/search?text=`, `DELETE /flashcards/{id}`

/// Authentication module
pub mod auth;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects module
pub mod dto;

/// Error types module
pub mod errors;

/// Web API handlers module
pub mod handlers;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Study session module
pub mod study;

/// Test utilities module
#[cfg(test)]
pub mod test_utils;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::AuthKeys;
use crate::db::DbPool;
use crate::handlers::*;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub auth: Arc<AuthKeys>,
}

impl AppState {
    pub fn new(pool: Arc<DbPool>, auth: AuthKeys) -> Self {
        Self { pool, auth: Arc::new(auth) }
    }
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<AuthKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `state` - The database pool and token keys shared with all handlers
///
/// ### Returns
///
/// An Axum Router with every route nested under `/api`
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        // Accounts and sessions
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler))
        // Collections
        .route("/collections", post(create_collection_handler).get(list_collections_handler))
        .route(
            "/collections/{collection_id}",
            get(get_collection_handler)
                .patch(update_collection_handler)
                .delete(delete_collection_handler),
        )
        .route("/public-collections", get(list_public_collections_handler))
        // Cards within a collection
        .route(
            "/collections/{collection_id}/flashcards",
            post(create_collection_card_handler).get(list_collection_cards_handler),
        )
        .route("/collections/{collection_id}/flashcards/public", get(list_public_collection_cards_handler))
        .route("/collections/{collection_id}/flashcards/search", get(search_cards_for_collection_handler))
        .route(
            "/collections/{collection_id}/flashcards/{card_id}",
            post(attach_card_handler)
                .put(set_learned_handler)
                .delete(detach_card_handler),
        )
        // Global card pool
        .route("/flashcards", get(list_flash_cards_handler))
        .route("/flashcards/search", get(search_flash_cards_handler))
        .route("/flashcards/{card_id}", axum::routing::delete(delete_flash_card_handler));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Errors
///
/// Returns an error if any pending migration fails to apply
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    tracing::info!("Applied {} pending migrations", applied.len());

    Ok(())
}
