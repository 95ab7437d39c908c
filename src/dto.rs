use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Collection, CollectionFlashCard, FlashCard, Role, User};

/// The lowest priority a card may be given in a collection
pub const MIN_PRIORITY: i32 = 1;

/// The highest priority a card may be given in a collection
pub const MAX_PRIORITY: i32 = 5;

/// Passwords shorter than this are rejected at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Returns the priority used when a request does not specify one
pub fn default_priority() -> i32 {
    MIN_PRIORITY
}

/// Resolves a requested priority into the value that gets stored
///
/// Absent and zero priorities fall back to [`default_priority`]; anything
/// else must lie within `MIN_PRIORITY..=MAX_PRIORITY`.
///
/// ### Errors
///
/// Returns a human-readable message when the priority is out of range
pub fn resolve_priority(priority: Option<i32>) -> Result<i32, String> {
    match priority {
        None | Some(0) => Ok(default_priority()),
        Some(p) if (MIN_PRIORITY..=MAX_PRIORITY).contains(&p) => Ok(p),
        Some(p) => Err(format!(
            "Priority must be between {} and {}, got {}",
            MIN_PRIORITY, MAX_PRIORITY, p
        )),
    }
}

/// Parses a collection deadline
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
/// Blank input means "no deadline".
pub fn parse_deadline(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| format!("Invalid deadline date format: {}", raw))
}

/// Trims a collection name and checks its length (3 to 50 characters)
pub fn validate_collection_name(name: &str) -> Result<String, String> {
    let name = name.trim();
    let len = name.chars().count();
    if !(3..=50).contains(&len) {
        return Err("Collection name must be between 3 and 50 characters long.".to_string());
    }
    Ok(name.to_string())
}

/// Data transfer object for registering a new user
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct RegisterDto {
    pub username: String,
    pub password: String,
    /// `USER` when omitted
    pub role: Option<String>,
}

/// Data transfer object for logging in
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

/// Public view of a user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.get_id(),
            username: user.get_username(),
            role: user.get_role(),
        }
    }
}

/// Response body of a successful login
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponseDto {
    pub message: String,
    pub token: String,
    pub user: UserDto,
}

/// Generic `{ "message": ... }` response body
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Data transfer object for creating a collection
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCollectionDto {
    pub name: String,
    pub description: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub deadline: Option<String>,
    pub is_public: bool,
}

/// Data transfer object for updating a collection
///
/// Absent fields are left untouched. An empty `deadline` or `description`
/// clears the stored value.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateCollectionDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub is_public: Option<bool>,
}

/// A collection together with how many cards it holds
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummaryDto {
    #[serde(flatten)]
    pub collection: Collection,
    pub card_count: i64,
    /// Only filled in for public listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_username: Option<String>,
}

/// A collection with all of its card relations
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDetailDto {
    #[serde(flatten)]
    pub collection: Collection,
    pub card_count: i64,
    pub cards: Vec<RelationDto>,
}

/// Data transfer object for creating a card directly inside a collection
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CreateFlashCardDto {
    pub question: String,
    pub answer: String,
    pub difficulty: Option<i32>,
    pub priority: Option<i32>,
}

/// Response body for a card created inside a collection
#[derive(Serialize, Deserialize, Debug)]
pub struct CreatedFlashCardDto {
    pub card: FlashCard,
    pub relation: CollectionFlashCard,
}

/// Data transfer object for attaching an existing card to a collection
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct AssignFlashCardDto {
    pub priority: Option<i32>,
}

/// Data transfer object for marking a card learned or unlearned
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetLearnedDto {
    pub is_learned: bool,
}

/// Query string for the text search endpoints
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct SearchQueryDto {
    pub text: String,
}

/// The card side of a relation as it appears on the wire
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlashCardDto {
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// A collection/card relation as it appears on the wire:
/// `{ id, flashCard: { id, question, answer }, isLearned, priority }`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RelationDto {
    pub id: String,
    pub flash_card: FlashCardDto,
    #[serde(default)]
    pub is_learned: bool,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl RelationDto {
    /// Builds the wire form from a stored relation and its card
    pub fn from_models(relation: &CollectionFlashCard, card: &FlashCard) -> Self {
        Self {
            id: relation.get_id(),
            flash_card: FlashCardDto {
                id: card.get_id(),
                question: card.get_question(),
                answer: card.get_answer(),
            },
            is_learned: relation.get_is_learned(),
            priority: Some(relation.get_priority()),
        }
    }
}
