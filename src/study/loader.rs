use rand::Rng;
use tracing::{debug, instrument};

use super::{build_queue, AccessError, CardRelation, RelationSource, ReviewSession, StudyError};

/// Proof that a load was started, carried until its result arrives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    collection_id: String,
}

impl LoadTicket {
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }
}

/// Turns fetched relations into review sessions, dropping superseded loads
///
/// Only the most recently requested collection counts; a result that
/// arrives for any other collection is discarded.
#[derive(Debug, Default)]
pub struct QueueLoader {
    latest: Option<String>,
}

impl QueueLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `collection_id` as the collection being loaded
    pub fn begin(&mut self, collection_id: impl Into<String>) -> LoadTicket {
        let collection_id = collection_id.into();
        self.latest = Some(collection_id.clone());
        LoadTicket { collection_id }
    }

    /// Whether a result for `ticket` would still be used
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.latest.as_deref() == Some(ticket.collection_id.as_str())
    }

    /// Builds the session for a finished fetch
    ///
    /// Returns None when the ticket has been superseded.
    pub fn complete<R: Rng + ?Sized>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<CardRelation>, AccessError>,
        rng: &mut R,
    ) -> Option<ReviewSession> {
        if !self.is_current(&ticket) {
            debug!(collection_id = %ticket.collection_id, "Discarding superseded load");
            return None;
        }

        let mut session = ReviewSession::new(ticket.collection_id);
        match result {
            Ok(relations) => session.load(build_queue(&relations, rng)),
            Err(e) => session.fail(&StudyError::Fetch(e)),
        };

        Some(session)
    }

    /// Fetches the relations of `collection_id` and builds its session
    #[instrument(skip(self, source, rng))]
    pub async fn start_session<S, R>(&mut self, source: &S, collection_id: &str, rng: &mut R) -> Option<ReviewSession>
    where
        S: RelationSource + ?Sized,
        R: Rng + ?Sized,
    {
        let ticket = self.begin(collection_id);
        let result = source.fetch_collection_relations(collection_id).await;
        self.complete(ticket, result, rng)
    }
}
