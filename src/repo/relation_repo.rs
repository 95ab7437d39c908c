use crate::db::DbPool;
use crate::models::{CollectionFlashCard, FlashCard};
use crate::repo::flash_card_repo::contains_pattern;
use crate::schema::{collection_flash_cards, flash_cards};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info, warn};

/// Adds an existing flashcard to a collection
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `collection_id` - The collection to add the card to
/// * `flash_card_id` - The card to add
/// * `priority` - The (already validated) study weight
///
/// ### Returns
///
/// A Result containing the new relation
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The card is already in the collection (unique constraint)
/// - The collection or card does not exist (foreign key)
#[instrument(skip(pool))]
pub fn add_card_to_collection(
    pool: &DbPool,
    collection_id: &str,
    flash_card_id: &str,
    priority: i32,
) -> Result<CollectionFlashCard> {
    let conn = &mut pool.get()?;

    let relation = CollectionFlashCard::new(collection_id.to_string(), flash_card_id.to_string(), priority);

    diesel::insert_into(collection_flash_cards::table)
        .values(&relation)
        .execute(conn)?;

    info!("Added card to collection");

    Ok(relation)
}

/// Creates a new flashcard and adds it to a collection in one transaction
///
/// ### Returns
///
/// A Result containing the new card and its relation
#[instrument(skip(pool, question, answer))]
pub fn create_card_in_collection(
    pool: &DbPool,
    collection_id: &str,
    question: String,
    answer: String,
    difficulty: i32,
    priority: i32,
) -> Result<(FlashCard, CollectionFlashCard)> {
    let conn = &mut pool.get()?;

    let card = FlashCard::new(question, answer, difficulty);
    let relation = CollectionFlashCard::new(collection_id.to_string(), card.get_id(), priority);

    conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::insert_into(flash_cards::table).values(&card).execute(conn)?;
        diesel::insert_into(collection_flash_cards::table).values(&relation).execute(conn)?;
        Ok(())
    })?;

    info!("Created card {} in collection", card.get_id());

    Ok((card, relation))
}

/// Retrieves the relation between a collection and a card
#[instrument(skip(pool))]
pub fn get_relation(pool: &DbPool, collection_id: &str, flash_card_id: &str) -> Result<Option<CollectionFlashCard>> {
    let conn = &mut pool.get()?;

    let result = collection_flash_cards::table
        .filter(collection_flash_cards::collection_id.eq(collection_id))
        .filter(collection_flash_cards::flash_card_id.eq(flash_card_id))
        .select(CollectionFlashCard::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists the relations of a collection joined with their cards, in the
/// order the cards were added
#[instrument(skip(pool))]
pub fn list_relations_with_cards(pool: &DbPool, collection_id: &str) -> Result<Vec<(CollectionFlashCard, FlashCard)>> {
    let conn = &mut pool.get()?;

    let result = collection_flash_cards::table
        .inner_join(flash_cards::table)
        .filter(collection_flash_cards::collection_id.eq(collection_id))
        .order(collection_flash_cards::created_at.asc())
        .select((CollectionFlashCard::as_select(), FlashCard::as_select()))
        .load::<(CollectionFlashCard, FlashCard)>(conn)?;

    debug!("Loaded {} relations", result.len());

    Ok(result)
}

/// Sets the learned flag of a card within a collection
///
/// ### Returns
///
/// A Result containing the updated relation, or None if the card is not in
/// the collection
#[instrument(skip(pool))]
pub fn set_is_learned(
    pool: &DbPool,
    collection_id: &str,
    flash_card_id: &str,
    is_learned: bool,
) -> Result<Option<CollectionFlashCard>> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(
        collection_flash_cards::table
            .filter(collection_flash_cards::collection_id.eq(collection_id))
            .filter(collection_flash_cards::flash_card_id.eq(flash_card_id)),
    )
    .set(collection_flash_cards::is_learned.eq(is_learned))
    .execute(conn)?;

    if updated == 0 {
        warn!("No relation to update");
        return Ok(None);
    }

    let relation = collection_flash_cards::table
        .filter(collection_flash_cards::collection_id.eq(collection_id))
        .filter(collection_flash_cards::flash_card_id.eq(flash_card_id))
        .select(CollectionFlashCard::as_select())
        .first(conn)?;

    info!("Set learned status to {}", is_learned);

    Ok(Some(relation))
}

/// Removes a card from a collection; the card itself is kept
///
/// ### Returns
///
/// A Result containing whether a relation was removed
#[instrument(skip(pool))]
pub fn remove_card_from_collection(pool: &DbPool, collection_id: &str, flash_card_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(
        collection_flash_cards::table
            .filter(collection_flash_cards::collection_id.eq(collection_id))
            .filter(collection_flash_cards::flash_card_id.eq(flash_card_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}

/// Finds cards matching `text` that are not yet part of the collection
#[instrument(skip(pool))]
pub fn search_cards_not_in_collection(pool: &DbPool, collection_id: &str, text: &str) -> Result<Vec<FlashCard>> {
    let conn = &mut pool.get()?;

    let present: Vec<String> = collection_flash_cards::table
        .filter(collection_flash_cards::collection_id.eq(collection_id))
        .select(collection_flash_cards::flash_card_id)
        .load(conn)?;

    let pattern = contains_pattern(text);

    let result = flash_cards::table
        .filter(flash_cards::id.ne_all(present))
        .filter(
            flash_cards::question.like(&pattern).escape('\\')
                .or(flash_cards::answer.like(&pattern).escape('\\')),
        )
        .order(flash_cards::created_at.asc())
        .select(FlashCard::as_select())
        .load(conn)?;

    debug!("Search matched {} cards outside the collection", result.len());

    Ok(result)
}
