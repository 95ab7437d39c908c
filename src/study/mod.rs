/// Study sessions
///
/// Builds weighted, shuffled review queues from a collection's card
/// relations and drives the flip / next / previous / toggle-learned loop
/// over them. The module knows nothing about HTTP or SQL: relations come
/// from a [`RelationSource`] and learned-status writes go to a
/// [`ProgressStore`]. [`RepoStudyBackend`] implements both on top of the
/// database; the CLI implements them over the REST API.

mod relation;
pub use relation::{CardRelation, StudyCard};

mod queue;
pub use queue::{build_queue, StudyQueue};

mod source;
pub use source::{AccessError, ProgressStore, RelationSource, StudyError};

mod session;
pub use session::{LearnedToggle, Outcome, ReviewSession, SessionState};

mod loader;
pub use loader::{LoadTicket, QueueLoader};

mod backend;
pub use backend::RepoStudyBackend;

#[cfg(test)]
mod tests;
