use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a named collection of flashcards owned by a user
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::collections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Unique identifier for the collection (UUID v4 as string)
    id: String,

    /// The ID of the user who owns this collection
    user_id: String,

    /// The display name, 3 to 50 characters
    name: String,

    /// Optional free-form description
    description: Option<String>,

    /// Optional date by which the collection should be learned
    deadline: Option<NaiveDateTime>,

    /// Whether other users may browse and study this collection
    is_public: bool,

    /// When this collection was created
    created_at: NaiveDateTime,
}

impl Collection {
    /// Creates a new collection
    ///
    /// ### Arguments
    ///
    /// * `user_id` - The owner of the collection
    /// * `name` - The (already validated) name
    /// * `description` - Optional description
    /// * `deadline` - Optional deadline
    /// * `is_public` - Whether the collection is shared publicly
    ///
    /// ### Returns
    ///
    /// A new `Collection` instance with a fresh ID
    pub fn new(
        user_id: String,
        name: String,
        description: Option<String>,
        deadline: Option<DateTime<Utc>>,
        is_public: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            description,
            deadline: deadline.map(|dt| dt.naive_utc()),
            is_public,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the collection's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the owner's user ID
    pub fn get_user_id(&self) -> String {
        self.user_id.clone()
    }

    /// Gets the collection's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Sets the collection's name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Gets the collection's description
    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    /// Sets the collection's description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Gets the collection's deadline as a DateTime<Utc>
    pub fn get_deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline.map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
    }

    /// Sets the collection's deadline
    pub fn set_deadline(&mut self, deadline: Option<DateTime<Utc>>) {
        self.deadline = deadline.map(|dt| dt.naive_utc());
    }

    /// Whether the collection is visible to everyone
    pub fn get_is_public(&self) -> bool {
        self.is_public
    }

    /// Sets the collection's visibility
    pub fn set_is_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    /// Gets the creation timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }

    /// Whether the given user owns this collection
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
