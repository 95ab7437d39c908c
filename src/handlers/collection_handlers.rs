use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::{
    parse_deadline, validate_collection_name, CollectionDetailDto, CollectionSummaryDto,
    CreateCollectionDto, RelationDto, UpdateCollectionDto,
};
use crate::errors::ApiError;
use crate::models::Collection;
use crate::repo;

/// Loads a collection or fails with 404
pub(crate) fn find_collection(pool: &DbPool, collection_id: &str) -> Result<Collection, ApiError> {
    repo::get_collection(pool, collection_id)?.ok_or(ApiError::NotFound)
}

/// Handler for creating a new collection
///
/// This function handles POST requests to `/api/collections`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `user` - The authenticated caller, who becomes the owner
/// * `payload` - Name, optional description and deadline, visibility
///
/// ### Returns
///
/// 201 with the newly created collection
#[instrument(skip(pool, user, payload), fields(user_id = %user.user_id))]
pub async fn create_collection_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Json(payload): Json<CreateCollectionDto>,
) -> Result<(StatusCode, Json<Collection>), ApiError> {
    let name = validate_collection_name(&payload.name).map_err(ApiError::Validation)?;
    let deadline = parse_deadline(payload.deadline.as_deref()).map_err(ApiError::Validation)?;
    let description = payload.description.filter(|d| !d.trim().is_empty());

    let collection = repo::create_collection(&pool, &user.user_id, name, description, deadline, payload.is_public)?;

    info!("Created collection with id: {}", collection.get_id());

    Ok((StatusCode::CREATED, Json(collection)))
}

/// Handler for listing the caller's collections
///
/// This function handles GET requests to `/api/collections`.
///
/// ### Returns
///
/// The caller's collections, newest first, each with its card count
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn list_collections_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
) -> Result<Json<Vec<CollectionSummaryDto>>, ApiError> {
    let collections = repo::list_collections_for_user(&pool, &user.user_id)?;

    debug!("Retrieved {} collections", collections.len());

    Ok(Json(
        collections
            .into_iter()
            .map(|(collection, card_count)| CollectionSummaryDto {
                collection,
                card_count,
                owner_username: None,
            })
            .collect(),
    ))
}

/// Handler for listing public collections
///
/// This function handles GET requests to `/api/public-collections`. No
/// authentication is needed.
#[instrument(skip(pool))]
pub async fn list_public_collections_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<CollectionSummaryDto>>, ApiError> {
    let collections = repo::list_public_collections(&pool)?;

    Ok(Json(
        collections
            .into_iter()
            .map(|(collection, owner_username, card_count)| CollectionSummaryDto {
                collection,
                card_count,
                owner_username: Some(owner_username),
            })
            .collect(),
    ))
}

/// Handler for getting one collection with its cards
///
/// This function handles GET requests to `/api/collections/{collection_id}`.
///
/// ### Errors
///
/// - 404 if the collection does not exist
/// - 403 if the caller is neither owner nor admin and the collection is private
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn get_collection_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(collection_id): Path<String>,
) -> Result<Json<CollectionDetailDto>, ApiError> {
    let collection = find_collection(&pool, &collection_id)?;

    if !user.can_read(&collection) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    let cards: Vec<RelationDto> = repo::list_relations_with_cards(&pool, &collection_id)?
        .iter()
        .map(|(relation, card)| RelationDto::from_models(relation, card))
        .collect();

    Ok(Json(CollectionDetailDto {
        collection,
        card_count: cards.len() as i64,
        cards,
    }))
}

/// Handler for updating a collection
///
/// This function handles PATCH requests to `/api/collections/{collection_id}`.
/// Only the fields present in the body change.
///
/// ### Errors
///
/// - 404 if the collection does not exist
/// - 403 unless the caller owns the collection or is an admin
/// - 400 for an invalid name or deadline
#[instrument(skip(pool, user, payload), fields(user_id = %user.user_id))]
pub async fn update_collection_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(collection_id): Path<String>,
    Json(payload): Json<UpdateCollectionDto>,
) -> Result<Json<Collection>, ApiError> {
    let mut collection = find_collection(&pool, &collection_id)?;

    if !user.can_manage(&collection) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    if let Some(name) = payload.name {
        collection.set_name(validate_collection_name(&name).map_err(ApiError::Validation)?);
    }

    if let Some(description) = payload.description {
        collection.set_description(Some(description).filter(|d| !d.trim().is_empty()));
    }

    if let Some(deadline) = payload.deadline {
        collection.set_deadline(parse_deadline(Some(&deadline)).map_err(ApiError::Validation)?);
    }

    if let Some(is_public) = payload.is_public {
        collection.set_is_public(is_public);
    }

    let updated = repo::update_collection(&pool, &collection)?;

    info!("Updated collection");

    Ok(Json(updated))
}

/// Handler for deleting a collection
///
/// This function handles DELETE requests to `/api/collections/{collection_id}`.
/// The collection's card relations go with it; the cards stay.
///
/// ### Returns
///
/// 204 on success
#[instrument(skip(pool, user), fields(user_id = %user.user_id))]
pub async fn delete_collection_handler(
    State(pool): State<Arc<DbPool>>,
    user: AuthUser,
    Path(collection_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let collection = find_collection(&pool, &collection_id)?;

    if !user.can_manage(&collection) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    if !repo::delete_collection(&pool, &collection_id)? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted collection");

    Ok(StatusCode::NO_CONTENT)
}
