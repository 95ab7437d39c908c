use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{MessageDto, SearchQueryDto};
use crate::errors::ApiError;
use crate::models::FlashCard;
use crate::repo;

/// Handler for listing every flashcard
///
/// This function handles GET requests to `/api/flashcards`.
#[instrument(skip(pool))]
pub async fn list_flash_cards_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<FlashCard>>, ApiError> {
    let cards = repo::list_flash_cards(&pool)?;

    debug!("Retrieved {} flashcards", cards.len());

    Ok(Json(cards))
}

/// Handler for searching flashcards by question or answer
///
/// This function handles GET requests to `/api/flashcards/search?text=`.
#[instrument(skip(pool, query), fields(text = %query.text))]
pub async fn search_flash_cards_handler(
    State(pool): State<Arc<DbPool>>,
    Query(query): Query<SearchQueryDto>,
) -> Result<Json<Vec<FlashCard>>, ApiError> {
    Ok(Json(repo::search_flash_cards(&pool, &query.text)?))
}

/// Handler for deleting a flashcard everywhere
///
/// This function handles DELETE requests to `/api/flashcards/{card_id}`.
///
/// ### Errors
///
/// - 403 unless the caller is an admin
/// - 404 if the card does not exist
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn delete_flash_card_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(card_id): Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    if !user.is_admin() {
        warn!("Non-admin tried to delete a flashcard");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    if !repo::delete_flash_card(&pool, &card_id)? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted flashcard {}", card_id);

    Ok(Json(MessageDto::new("Flashcard deleted")))
}
