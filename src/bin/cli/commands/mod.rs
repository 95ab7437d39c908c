pub mod auth;
pub mod card;
pub mod collection;
pub mod study;
