use std::collections::HashMap;

use crate::db::DbPool;
use crate::models::Collection;
use crate::schema::{collection_flash_cards, collections, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Creates a new collection in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the new collection
/// * `name` - The validated collection name
/// * `description` - Optional description
/// * `deadline` - Optional deadline
/// * `is_public` - Whether the collection is shared publicly
///
/// ### Returns
///
/// A Result containing the newly created Collection if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The owner does not exist (foreign key)
/// - The database insert operation fails
#[instrument(skip(pool, description), fields(user_id = %user_id, name = %name, is_public = %is_public))]
pub fn create_collection(
    pool: &DbPool,
    user_id: &str,
    name: String,
    description: Option<String>,
    deadline: Option<DateTime<Utc>>,
    is_public: bool,
) -> Result<Collection> {
    debug!("Creating new collection");

    let conn = &mut pool.get()?;

    let new_collection = Collection::new(user_id.to_string(), name, description, deadline, is_public);

    diesel::insert_into(collections::table)
        .values(&new_collection)
        .execute(conn)?;

    info!("Successfully created collection with id: {}", new_collection.get_id());

    Ok(new_collection)
}

/// Retrieves a collection by ID
///
/// ### Returns
///
/// A Result containing an Option with the Collection if found
#[instrument(skip(pool))]
pub fn get_collection(pool: &DbPool, collection_id: &str) -> Result<Option<Collection>> {
    let conn = &mut pool.get()?;

    let result = collections::table
        .find(collection_id)
        .select(Collection::as_select())
        .first(conn)
        .optional()?;

    if result.is_none() {
        debug!("Collection not found");
    }

    Ok(result)
}

/// Counts the relations of each of the given collections
///
/// Collections without cards are absent from the map.
fn card_counts(conn: &mut SqliteConnection, collection_ids: &[String]) -> QueryResult<HashMap<String, i64>> {
    let rows = collection_flash_cards::table
        .filter(collection_flash_cards::collection_id.eq_any(collection_ids))
        .group_by(collection_flash_cards::collection_id)
        .select((collection_flash_cards::collection_id, diesel::dsl::count_star()))
        .load::<(String, i64)>(conn)?;

    Ok(rows.into_iter().collect())
}

/// Counts the cards in a single collection
#[instrument(skip(pool))]
pub fn count_cards_in_collection(pool: &DbPool, collection_id: &str) -> Result<i64> {
    let conn = &mut pool.get()?;

    let count = collection_flash_cards::table
        .filter(collection_flash_cards::collection_id.eq(collection_id))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Lists the collections owned by a user, newest first, with card counts
///
/// ### Returns
///
/// A Result containing `(collection, card_count)` pairs
#[instrument(skip(pool))]
pub fn list_collections_for_user(pool: &DbPool, user_id: &str) -> Result<Vec<(Collection, i64)>> {
    let conn = &mut pool.get()?;

    let owned = collections::table
        .filter(collections::user_id.eq(user_id))
        .order(collections::created_at.desc())
        .select(Collection::as_select())
        .load(conn)?;

    let ids: Vec<String> = owned.iter().map(Collection::get_id).collect();
    let counts = card_counts(conn, &ids)?;

    debug!("Found {} collections", owned.len());

    Ok(owned
        .into_iter()
        .map(|collection| {
            let count = counts.get(&collection.get_id()).copied().unwrap_or(0);
            (collection, count)
        })
        .collect())
}

/// Lists every public collection, newest first, with its owner's username
/// and card count
///
/// ### Returns
///
/// A Result containing `(collection, owner_username, card_count)` triples
#[instrument(skip(pool))]
pub fn list_public_collections(pool: &DbPool) -> Result<Vec<(Collection, String, i64)>> {
    let conn = &mut pool.get()?;

    let public = collections::table
        .inner_join(users::table)
        .filter(collections::is_public.eq(true))
        .order(collections::created_at.desc())
        .select((Collection::as_select(), users::username))
        .load::<(Collection, String)>(conn)?;

    let ids: Vec<String> = public.iter().map(|(collection, _)| collection.get_id()).collect();
    let counts = card_counts(conn, &ids)?;

    debug!("Found {} public collections", public.len());

    Ok(public
        .into_iter()
        .map(|(collection, username)| {
            let count = counts.get(&collection.get_id()).copied().unwrap_or(0);
            (collection, username, count)
        })
        .collect())
}

/// Writes all mutable fields of a collection back to the database
///
/// ### Errors
///
/// Returns an error if the collection does not exist or the update fails
#[instrument(skip(pool, collection), fields(collection_id = %collection.get_id()))]
pub fn update_collection(pool: &DbPool, collection: &Collection) -> Result<Collection> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(collections::table.find(collection.get_id()))
        .set(collection)
        .execute(conn)?;

    if updated == 0 {
        return Err(anyhow::anyhow!("Collection not found"));
    }

    info!("Updated collection");

    Ok(collection.clone())
}

/// Deletes a collection together with its card relations
///
/// The cards themselves are kept; they may belong to other collections.
///
/// ### Returns
///
/// A Result containing whether a collection was deleted
#[instrument(skip(pool))]
pub fn delete_collection(pool: &DbPool, collection_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = conn.transaction::<_, anyhow::Error, _>(|conn| {
        let relations = diesel::delete(
            collection_flash_cards::table.filter(collection_flash_cards::collection_id.eq(collection_id)),
        )
        .execute(conn)?;
        debug!("Removed {} card relations", relations);

        Ok(diesel::delete(collections::table.find(collection_id)).execute(conn)?)
    })?;

    if deleted > 0 {
        info!("Deleted collection");
    }

    Ok(deleted > 0)
}
