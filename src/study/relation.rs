use crate::dto::RelationDto;

/// A card as it sits in one collection, flattened from the wire format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRelation {
    pub relation_id: String,
    pub card_id: String,
    pub question: String,
    pub answer: String,
    pub is_learned: bool,
    /// Raw priority; absent or zero counts as 1
    pub priority: Option<i32>,
}

impl CardRelation {
    /// Number of queue slots this relation is worth when unlearned
    ///
    /// Not clamped: a negative priority yields no slots.
    pub fn weight(&self) -> i32 {
        match self.priority {
            None | Some(0) => 1,
            Some(priority) => priority,
        }
    }

    /// Flattens the relation into a queue entry
    pub fn to_study_card(&self) -> StudyCard {
        StudyCard {
            id: self.card_id.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
            is_learned: self.is_learned,
            relation_id: self.relation_id.clone(),
            priority: self.weight(),
        }
    }
}

impl From<RelationDto> for CardRelation {
    fn from(dto: RelationDto) -> Self {
        Self {
            relation_id: dto.id,
            card_id: dto.flash_card.id,
            question: dto.flash_card.question,
            answer: dto.flash_card.answer,
            is_learned: dto.is_learned,
            priority: dto.priority,
        }
    }
}

/// One slot of a study queue
///
/// `id` is the card id; a card with priority `p` occupies `p` slots that
/// all share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyCard {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub is_learned: bool,
    pub relation_id: String,
    /// Effective weight
    pub priority: i32,
}
