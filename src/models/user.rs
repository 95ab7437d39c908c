use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

/// Represents a registered user
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier for the user (UUID v4 as string)
    id: String,

    /// The unique login name of the user
    username: String,

    /// Argon2 PHC string; never serialized
    #[serde(skip)]
    password_hash: String,

    /// Whether the user is a regular user or an administrator
    role: Role,

    /// When this user registered
    created_at: NaiveDateTime,
}

impl User {
    /// Creates a new user
    ///
    /// ### Arguments
    ///
    /// * `username` - The login name of the user
    /// * `password_hash` - The already-hashed password
    /// * `role` - The role of the user
    ///
    /// ### Returns
    ///
    /// A new `User` instance with a fresh ID
    pub fn new(username: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            role,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Gets the user's ID
    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    /// Gets the user's login name
    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    /// Gets the stored password hash
    pub fn get_password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Gets the user's role
    pub fn get_role(&self) -> Role {
        self.role
    }

    /// Gets the registration timestamp as a DateTime<Utc>
    pub fn get_created_at(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.created_at, Utc)
    }
}
