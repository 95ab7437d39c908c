use tracing::{debug, info, instrument, warn};

use super::{ProgressStore, StudyCard, StudyError, StudyQueue};

/// Where a review session stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the relations of the collection
    Loading,
    /// Nothing left to study
    Empty,
    /// Showing the card at `position`, answer visible when `flipped`
    Active { position: usize, flipped: bool },
    /// Advanced past the last card
    Finished,
    /// The relations could not be fetched
    LoadFailed { reason: String },
}

impl SessionState {
    /// Whether no further command can change the state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Empty | Self::Finished | Self::LoadFailed { .. })
    }
}

/// Result of feeding one command to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The command does not apply in the current state
    Ignored,
    /// The last card was passed
    Completed,
}

/// A learned-status write that has been decided but not yet acknowledged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedToggle {
    pub collection_id: String,
    pub card_id: String,
    pub is_learned: bool,
}

/// The review loop over one collection's queue
#[derive(Debug, Clone)]
pub struct ReviewSession {
    collection_id: String,
    queue: StudyQueue,
    state: SessionState,
}

impl ReviewSession {
    /// Creates a session in the `Loading` state
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            queue: StudyQueue::default(),
            state: SessionState::Loading,
        }
    }

    /// Hands the built queue to a loading session
    ///
    /// An empty queue ends the session right away.
    pub fn load(&mut self, queue: StudyQueue) -> Outcome {
        if self.state != SessionState::Loading {
            return Outcome::Ignored;
        }

        self.state = if queue.is_empty() {
            info!(collection_id = %self.collection_id, "Nothing to study");
            SessionState::Empty
        } else {
            info!(collection_id = %self.collection_id, slots = queue.len(), "Study session started");
            SessionState::Active { position: 0, flipped: false }
        };
        self.queue = queue;

        Outcome::Continue
    }

    /// Records that the relations could not be fetched
    pub fn fail(&mut self, error: &StudyError) -> Outcome {
        if self.state != SessionState::Loading {
            return Outcome::Ignored;
        }

        warn!(collection_id = %self.collection_id, "Study session failed to load: {}", error);
        self.state = SessionState::LoadFailed { reason: error.to_string() };

        Outcome::Continue
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn queue(&self) -> &StudyQueue {
        &self.queue
    }

    /// The card being shown, if any
    pub fn current(&self) -> Option<&StudyCard> {
        match self.state {
            SessionState::Active { position, .. } => self.queue.get(position),
            _ => None,
        }
    }

    /// Whether the answer of the current card is showing
    pub fn is_flipped(&self) -> bool {
        matches!(self.state, SessionState::Active { flipped: true, .. })
    }

    /// One-based position and queue length while active
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.state {
            SessionState::Active { position, .. } => Some((position + 1, self.queue.len())),
            _ => None,
        }
    }

    pub fn flip(&mut self) -> Outcome {
        match self.state {
            SessionState::Active { position, flipped } => {
                self.state = SessionState::Active { position, flipped: !flipped };
                Outcome::Continue
            }
            _ => Outcome::Ignored,
        }
    }

    /// Moves to the next card, finishing the session after the last one
    pub fn next(&mut self) -> Outcome {
        match self.state {
            SessionState::Active { position, .. } if position + 1 < self.queue.len() => {
                self.state = SessionState::Active { position: position + 1, flipped: false };
                Outcome::Continue
            }
            SessionState::Active { .. } => {
                info!(collection_id = %self.collection_id, "Study session completed");
                self.state = SessionState::Finished;
                Outcome::Completed
            }
            _ => Outcome::Ignored,
        }
    }

    /// Moves to the previous card; at the first card only hides the answer
    pub fn previous(&mut self) -> Outcome {
        match self.state {
            SessionState::Active { position, .. } => {
                self.state = SessionState::Active { position: position.saturating_sub(1), flipped: false };
                Outcome::Continue
            }
            _ => Outcome::Ignored,
        }
    }

    /// Decides the write that toggles the current card's learned flag
    ///
    /// Nothing changes until the write is acknowledged and passed to
    /// [`apply_toggle`](Self::apply_toggle).
    pub fn begin_toggle(&self) -> Option<LearnedToggle> {
        self.current().map(|card| LearnedToggle {
            collection_id: self.collection_id.clone(),
            card_id: card.id.clone(),
            is_learned: !card.is_learned,
        })
    }

    /// Applies an acknowledged toggle to every slot of the card
    ///
    /// Returns the number of slots updated. Toggles for another collection
    /// are ignored.
    pub fn apply_toggle(&mut self, toggle: &LearnedToggle) -> usize {
        if toggle.collection_id != self.collection_id {
            debug!("Ignoring toggle for another collection");
            return 0;
        }
        self.queue.mark_learned(&toggle.card_id, toggle.is_learned)
    }

    /// Toggles the current card's learned flag through `store`
    ///
    /// The queue only changes once the store acknowledges the write; on
    /// failure it is left as it was and the error is returned.
    #[instrument(skip(self, store), fields(collection_id = %self.collection_id))]
    pub async fn toggle_learned<S: ProgressStore + ?Sized>(&mut self, store: &S) -> Result<Outcome, StudyError> {
        let Some(toggle) = self.begin_toggle() else {
            return Ok(Outcome::Ignored);
        };

        store
            .write_learned_status(&toggle.collection_id, &toggle.card_id, toggle.is_learned)
            .await
            .map_err(StudyError::Write)?;

        let updated = self.apply_toggle(&toggle);
        debug!("Marked {} slots as learned={}", updated, toggle.is_learned);

        Ok(Outcome::Continue)
    }
}
