use std::future::Future;

use thiserror::Error;

use super::CardRelation;

/// Why a collaborator refused or failed a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Not found")]
    NotFound,

    #[error("Access denied")]
    Forbidden,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors surfaced to whoever drives a study session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StudyError {
    #[error("Failed to load cards: {0}")]
    Fetch(AccessError),

    #[error("Failed to update learned status: {0}")]
    Write(AccessError),
}

/// Supplies every card relation of a collection, learned ones included
pub trait RelationSource {
    fn fetch_collection_relations(
        &self,
        collection_id: &str,
    ) -> impl Future<Output = Result<Vec<CardRelation>, AccessError>> + Send;
}

/// Persists the learned flag of a card within a collection
pub trait ProgressStore {
    fn write_learned_status(
        &self,
        collection_id: &str,
        card_id: &str,
        is_learned: bool,
    ) -> impl Future<Output = Result<(), AccessError>> + Send;
}
