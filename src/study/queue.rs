use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{CardRelation, StudyCard};

/// An ordered snapshot of the cards to review in one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyQueue {
    cards: Vec<StudyCard>,
}

impl StudyQueue {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&StudyCard> {
        self.cards.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StudyCard> {
        self.cards.iter()
    }

    /// Sets the learned flag on every slot holding `card_id`
    ///
    /// Returns the number of slots updated.
    pub fn mark_learned(&mut self, card_id: &str, is_learned: bool) -> usize {
        let mut updated = 0;
        for card in self.cards.iter_mut().filter(|card| card.id == card_id) {
            card.is_learned = is_learned;
            updated += 1;
        }
        updated
    }
}

impl From<Vec<StudyCard>> for StudyQueue {
    fn from(cards: Vec<StudyCard>) -> Self {
        Self { cards }
    }
}

/// Builds the review queue for one session
///
/// Learned relations are dropped, every other relation is repeated as many
/// times as its weight, and the result is shuffled with `rng`.
pub fn build_queue<R: Rng + ?Sized>(relations: &[CardRelation], rng: &mut R) -> StudyQueue {
    let mut cards = Vec::new();

    for relation in relations.iter().filter(|relation| !relation.is_learned) {
        for _ in 0..relation.weight() {
            cards.push(relation.to_study_card());
        }
    }

    cards.shuffle(rng);

    debug!("Built study queue with {} slots from {} relations", cards.len(), relations.len());

    StudyQueue { cards }
}
