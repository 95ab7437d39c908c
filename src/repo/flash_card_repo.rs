use crate::db::DbPool;
use crate::models::FlashCard;
use crate::schema::{collection_flash_cards, flash_cards};
use diesel::prelude::*;
use anyhow::Result;
use tracing::{instrument, debug, info};

/// Builds a LIKE pattern matching `text` anywhere, with `\` as the escape
/// character for `%`, `_` and `\` itself
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Creates a new flashcard in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `question` - The front of the card
/// * `answer` - The back of the card
/// * `difficulty` - The author-assigned difficulty
///
/// ### Returns
///
/// A Result containing the newly created FlashCard if successful
#[instrument(skip(pool, question, answer), fields(difficulty = %difficulty))]
pub fn create_flash_card(pool: &DbPool, question: String, answer: String, difficulty: i32) -> Result<FlashCard> {
    let conn = &mut pool.get()?;

    let new_card = FlashCard::new(question, answer, difficulty);

    diesel::insert_into(flash_cards::table)
        .values(&new_card)
        .execute(conn)?;

    info!("Successfully created flashcard with id: {}", new_card.get_id());

    Ok(new_card)
}

/// Retrieves a flashcard by ID
#[instrument(skip(pool))]
pub fn get_flash_card(pool: &DbPool, card_id: &str) -> Result<Option<FlashCard>> {
    let conn = &mut pool.get()?;

    let result = flash_cards::table
        .find(card_id)
        .select(FlashCard::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Lists every flashcard, oldest first
#[instrument(skip(pool))]
pub fn list_flash_cards(pool: &DbPool) -> Result<Vec<FlashCard>> {
    let conn = &mut pool.get()?;

    let result = flash_cards::table
        .order(flash_cards::created_at.asc())
        .select(FlashCard::as_select())
        .load(conn)?;

    Ok(result)
}

/// Finds flashcards whose question or answer contains `text`
///
/// Matching is case-insensitive for ASCII (SQLite LIKE semantics) and the
/// text is trimmed first; an empty text matches every card.
#[instrument(skip(pool))]
pub fn search_flash_cards(pool: &DbPool, text: &str) -> Result<Vec<FlashCard>> {
    let conn = &mut pool.get()?;

    let pattern = contains_pattern(text);

    let result = flash_cards::table
        .filter(
            flash_cards::question.like(&pattern).escape('\\')
                .or(flash_cards::answer.like(&pattern).escape('\\')),
        )
        .order(flash_cards::created_at.asc())
        .select(FlashCard::as_select())
        .load(conn)?;

    debug!("Search matched {} cards", result.len());

    Ok(result)
}

/// Permanently deletes a flashcard and removes it from every collection
///
/// ### Returns
///
/// A Result containing whether a card was deleted
#[instrument(skip(pool))]
pub fn delete_flash_card(pool: &DbPool, card_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = conn.transaction::<_, anyhow::Error, _>(|conn| {
        diesel::delete(
            collection_flash_cards::table.filter(collection_flash_cards::flash_card_id.eq(card_id)),
        )
        .execute(conn)?;

        Ok(diesel::delete(flash_cards::table.find(card_id)).execute(conn)?)
    })?;

    if deleted > 0 {
        info!("Deleted flashcard");
    }

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("abc"), "%abc%");
        assert_eq!(contains_pattern("  50%_off "), "%50\\%\\_off%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_create_and_get_flash_card() {
        let pool = setup_test_db();

        let card = create_flash_card(&pool, "Capital of France?".to_string(), "Paris".to_string(), 2).unwrap();
        let fetched = get_flash_card(&pool, &card.get_id()).unwrap().unwrap();

        assert_eq!(fetched, card);
        assert!(get_flash_card(&pool, "nonexistent-id").unwrap().is_none());
    }

    #[test]
    fn test_list_flash_cards() {
        let pool = setup_test_db();

        let a = create_flash_card(&pool, "a".to_string(), "1".to_string(), 1).unwrap();
        let b = create_flash_card(&pool, "b".to_string(), "2".to_string(), 1).unwrap();

        let cards = list_flash_cards(&pool).unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().any(|c| c.get_id() == a.get_id()));
        assert!(cards.iter().any(|c| c.get_id() == b.get_id()));
    }

    #[test]
    fn test_search_flash_cards_matches_question_or_answer() {
        let pool = setup_test_db();

        let capital = create_flash_card(&pool, "Capital of France?".to_string(), "Paris".to_string(), 1).unwrap();
        let river = create_flash_card(&pool, "Longest river?".to_string(), "The Nile".to_string(), 1).unwrap();

        let by_question = search_flash_cards(&pool, "capital").unwrap();
        assert_eq!(by_question.len(), 1);
        assert_eq!(by_question[0].get_id(), capital.get_id());

        let by_answer = search_flash_cards(&pool, "NILE").unwrap();
        assert_eq!(by_answer.len(), 1);
        assert_eq!(by_answer[0].get_id(), river.get_id());

        assert_eq!(search_flash_cards(&pool, "").unwrap().len(), 2);
        assert!(search_flash_cards(&pool, "%").unwrap().is_empty());
    }

    #[test]
    fn test_delete_flash_card() {
        let pool = setup_test_db();

        let card = create_flash_card(&pool, "q".to_string(), "a".to_string(), 1).unwrap();

        assert!(delete_flash_card(&pool, &card.get_id()).unwrap());
        assert!(get_flash_card(&pool, &card.get_id()).unwrap().is_none());
        assert!(!delete_flash_card(&pool, &card.get_id()).unwrap());
    }
}
