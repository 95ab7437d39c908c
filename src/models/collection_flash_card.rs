use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The join record between a collection and a flashcard
///
/// Carries the per-collection study state of the card: whether it has been
/// learned and how heavily it is weighted in study sessions.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::collection_flash_cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CollectionFlashCard {
    /// Unique identifier for the relation (UUID v4 as string)
    id: String,

    /// The collection side of the relation
    collection_id: String,

    /// The card side of the relation
    flash_card_id: String,

    /// Whether the card has been marked learned in this collection
    is_learned: bool,

    /// Study weight, validated to 1..=5 when written
    priority: i32,

    /// When the card was added to the collection
    created_at: NaiveDateTime,
}

impl CollectionFlashCard {
    /// Creates a new, unlearned relation
    ///
    /// ### Arguments
    ///
    /// * `collection_id` - The collection the card is added to
    /// * `flash_card_id` - The card being added
    /// * `priority` - The study weight of the card in this collection
    pub fn new(collection_id: String, flash_card_id: String, priority: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            collection_id,
            flash_card_id,
            is_learned: false,
            priority,
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_collection_id(&self) -> String {
        self.collection_id.clone()
    }

    pub fn get_flash_card_id(&self) -> String {
        self.flash_card_id.clone()
    }

    pub fn get_is_learned(&self) -> bool {
        self.is_learned
    }

    pub fn set_is_learned(&mut self, is_learned: bool) {
        self.is_learned = is_learned;
    }

    pub fn get_priority(&self) -> i32 {
        self.priority
    }

    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
