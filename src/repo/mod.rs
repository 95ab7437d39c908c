/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for interacting with the database: users,
/// collections, flashcards and the relations that place cards in
/// collections along with their study state.
///
/// Functions are synchronous and take the pool directly; handlers call
/// them from async code the same way.

mod user_repo;
mod collection_repo;
mod flash_card_repo;
mod relation_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use collection_repo::*;
pub use flash_card_repo::*;
pub use relation_repo::*;
