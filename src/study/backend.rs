use std::sync::Arc;

use tracing::{instrument, warn};

use super::{AccessError, CardRelation, ProgressStore, RelationSource};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::dto::RelationDto;
use crate::repo;

/// Study collaborator that talks to the database directly
///
/// Every request is checked against the user it was built for, with the
/// same rules the REST handlers apply: reading needs owner, admin or a
/// public collection; writing the learned flag needs the owner.
#[derive(Debug, Clone)]
pub struct RepoStudyBackend {
    pool: Arc<DbPool>,
    user: AuthUser,
}

impl RepoStudyBackend {
    pub fn new(pool: Arc<DbPool>, user: AuthUser) -> Self {
        Self { pool, user }
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }
}

fn transport(e: anyhow::Error) -> AccessError {
    warn!("Study backend database error: {:?}", e);
    AccessError::Transport(e.to_string())
}

impl RelationSource for RepoStudyBackend {
    #[instrument(skip(self), fields(user_id = %self.user.user_id))]
    async fn fetch_collection_relations(&self, collection_id: &str) -> Result<Vec<CardRelation>, AccessError> {
        let collection = repo::get_collection(&self.pool, collection_id)
            .map_err(transport)?
            .ok_or(AccessError::NotFound)?;

        if !self.user.can_read(&collection) {
            return Err(AccessError::Forbidden);
        }

        let relations = repo::list_relations_with_cards(&self.pool, collection_id).map_err(transport)?;

        Ok(relations
            .iter()
            .map(|(relation, card)| CardRelation::from(RelationDto::from_models(relation, card)))
            .collect())
    }
}

impl ProgressStore for RepoStudyBackend {
    #[instrument(skip(self), fields(user_id = %self.user.user_id))]
    async fn write_learned_status(&self, collection_id: &str, card_id: &str, is_learned: bool) -> Result<(), AccessError> {
        let collection = repo::get_collection(&self.pool, collection_id)
            .map_err(transport)?
            .ok_or(AccessError::NotFound)?;

        if !self.user.owns(&collection) {
            return Err(AccessError::Forbidden);
        }

        repo::set_is_learned(&self.pool, collection_id, card_id, is_learned)
            .map_err(transport)?
            .ok_or(AccessError::NotFound)?;

        Ok(())
    }
}
