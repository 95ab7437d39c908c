use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a question/answer flashcard
///
/// Cards are global; collections reference them through
/// [`CollectionFlashCard`](super::CollectionFlashCard) relations.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flash_cards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FlashCard {
    /// Unique identifier for the card (UUID v4 as string)
    id: String,

    /// The prompt shown on the front of the card
    question: String,

    /// The answer shown on the back of the card
    answer: String,

    /// Author-assigned difficulty, defaults to 1
    difficulty: i32,

    /// When this card was created
    created_at: NaiveDateTime,
}

impl FlashCard {
    /// Creates a new flashcard
    ///
    /// ### Arguments
    ///
    /// * `question` - The front of the card
    /// * `answer` - The back of the card
    /// * `difficulty` - The author-assigned difficulty
    ///
    /// ### Returns
    ///
    /// A new `FlashCard` instance with a fresh ID
    pub fn new(question: String, answer: String, difficulty: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question,
            answer,
            difficulty,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the card's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the card's question
    pub fn get_question(&self) -> String {
        self.question.clone()
    }

    /// Gets the card's answer
    pub fn get_answer(&self) -> String {
        self.answer.clone()
    }

    /// Gets the card's difficulty
    pub fn get_difficulty(&self) -> i32 {
        self.difficulty
    }

    /// Gets the creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
