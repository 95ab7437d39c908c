use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use super::collection_handlers::find_collection;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{
    resolve_priority, AssignFlashCardDto, CreateFlashCardDto, CreatedFlashCardDto, MessageDto,
    RelationDto, SearchQueryDto, SetLearnedDto,
};
use crate::errors::ApiError;
use crate::models::{Collection, CollectionFlashCard, FlashCard};
use crate::repo;

/// Loads a collection the caller owns, or fails with 404/403
fn owned_collection(pool: &DbPool, user: &AuthUser, collection_id: &str) -> Result<Collection, ApiError> {
    let collection = find_collection(pool, collection_id)?;

    if !user.owns(&collection) {
        return Err(ApiError::Forbidden("Only the owner can change this collection".to_string()));
    }

    Ok(collection)
}

fn relations_of(pool: &DbPool, collection_id: &str) -> Result<Vec<RelationDto>, ApiError> {
    Ok(repo::list_relations_with_cards(pool, collection_id)?
        .iter()
        .map(|(relation, card)| RelationDto::from_models(relation, card))
        .collect())
}

/// Handler for creating a card inside a collection
///
/// This function handles POST requests to
/// `/api/collections/{collection_id}/flashcards`. The card and its relation
/// are written together.
///
/// ### Returns
///
/// 201 with the card and the relation
///
/// ### Errors
///
/// - 400 if the question or answer is blank or the priority is out of range
/// - 403 unless the caller owns the collection
/// - 404 if the collection does not exist
#[instrument(skip(pool, user, payload), fields(user_id = %user.user_id))]
pub async fn create_collection_card_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(collection_id): Path<String>,
    Json(payload): Json<CreateFlashCardDto>,
) -> Result<(StatusCode, Json<CreatedFlashCardDto>), ApiError> {
    owned_collection(&pool, &user, &collection_id)?;

    let question = payload.question.trim().to_string();
    let answer = payload.answer.trim().to_string();

    if question.is_empty() || answer.is_empty() {
        return Err(ApiError::Validation("Question and answer are required".to_string()));
    }

    let priority = resolve_priority(payload.priority).map_err(ApiError::InvalidPriority)?;
    let difficulty = payload.difficulty.unwrap_or(1);

    let (card, relation) =
        repo::create_card_in_collection(&pool, &collection_id, question, answer, difficulty, priority)?;

    info!("Created card {} in collection", card.get_id());

    Ok((StatusCode::CREATED, Json(CreatedFlashCardDto { card, relation })))
}

/// Handler for listing the cards of a collection
///
/// This function handles GET requests to
/// `/api/collections/{collection_id}/flashcards`.
///
/// ### Returns
///
/// The relations in wire format, learned ones included
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn list_collection_cards_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(collection_id): Path<String>,
) -> Result<Json<Vec<RelationDto>>, ApiError> {
    let collection = find_collection(&pool, &collection_id)?;

    if !user.can_read(&collection) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    let relations = relations_of(&pool, &collection_id)?;
    debug!("Retrieved {} relations", relations.len());

    Ok(Json(relations))
}

/// Handler for listing the cards of a public collection without logging in
///
/// This function handles GET requests to
/// `/api/collections/{collection_id}/flashcards/public`.
#[instrument(skip(pool))]
pub async fn list_public_collection_cards_handler(
    State(pool): State<Arc<DbPool>>,
    Path(collection_id): Path<String>,
) -> Result<Json<Vec<RelationDto>>, ApiError> {
    let collection = find_collection(&pool, &collection_id)?;

    if !collection.get_is_public() {
        return Err(ApiError::Forbidden("This collection is not public".to_string()));
    }

    Ok(Json(relations_of(&pool, &collection_id)?))
}

/// Handler for finding cards that could be added to a collection
///
/// This function handles GET requests to
/// `/api/collections/{collection_id}/flashcards/search?text=`.
#[instrument(skip(pool, user, query), fields(user_id = %user.user_id, text = %query.text))]
pub async fn search_cards_for_collection_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(collection_id): Path<String>,
    Query(query): Query<SearchQueryDto>,
) -> Result<Json<Vec<FlashCard>>, ApiError> {
    owned_collection(&pool, &user, &collection_id)?;

    let cards = repo::search_cards_not_in_collection(&pool, &collection_id, &query.text)?;

    Ok(Json(cards))
}

/// Handler for attaching an existing card to a collection
///
/// This function handles POST requests to
/// `/api/collections/{collection_id}/flashcards/{card_id}`. The body is
/// optional and may carry a priority.
///
/// ### Errors
///
/// - 404 if the collection or card does not exist
/// - 409 if the card is already in the collection
/// - 400 if the priority is out of range
#[instrument(skip(pool, user, body), fields(user_id = %user.user_id))]
pub async fn attach_card_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path((collection_id, card_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<CollectionFlashCard>), ApiError> {
    owned_collection(&pool, &user, &collection_id)?;

    repo::get_flash_card(&pool, &card_id)?.ok_or(ApiError::NotFound)?;

    if repo::get_relation(&pool, &collection_id, &card_id)?.is_some() {
        return Err(ApiError::Conflict("Flashcard already exists in the collection".to_string()));
    }

    let payload: AssignFlashCardDto = if body.iter().all(u8::is_ascii_whitespace) {
        AssignFlashCardDto::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?
    };
    let priority = resolve_priority(payload.priority).map_err(ApiError::InvalidPriority)?;

    let relation = repo::add_card_to_collection(&pool, &collection_id, &card_id, priority)?;

    info!("Attached card to collection");

    Ok((StatusCode::CREATED, Json(relation)))
}

/// Handler for marking a card learned or unlearned
///
/// This function handles PUT requests to
/// `/api/collections/{collection_id}/flashcards/{card_id}`.
///
/// ### Errors
///
/// - 404 if the collection does not exist or the card is not in it
/// - 403 unless the caller owns the collection
#[instrument(skip(pool, user, payload), fields(user_id = %user.user_id, is_learned = %payload.is_learned))]
pub async fn set_learned_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path((collection_id, card_id)): Path<(String, String)>,
    Json(payload): Json<SetLearnedDto>,
) -> Result<Json<CollectionFlashCard>, ApiError> {
    owned_collection(&pool, &user, &collection_id)?;

    let relation = repo::set_is_learned(&pool, &collection_id, &card_id, payload.is_learned)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(relation))
}

/// Handler for removing a card from a collection
///
/// This function handles DELETE requests to
/// `/api/collections/{collection_id}/flashcards/{card_id}`. The card itself
/// is kept.
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn detach_card_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path((collection_id, card_id)): Path<(String, String)>,
) -> Result<Json<MessageDto>, ApiError> {
    owned_collection(&pool, &user, &collection_id)?;

    if !repo::remove_card_from_collection(&pool, &collection_id, &card_id)? {
        return Err(ApiError::NotFound);
    }

    info!("Removed card from collection");

    Ok(Json(MessageDto::new("Flashcard removed from collection")))
}
