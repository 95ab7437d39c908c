/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// It includes database models that map to database tables, as well as methods
/// for creating and manipulating these models.

// Re-export all model types
mod role;
pub use role::Role;

mod user;
pub use user::User;

mod collection;
pub use collection::Collection;

mod flash_card;
pub use flash_card::FlashCard;

mod collection_flash_card;
pub use collection_flash_card::CollectionFlashCard;
