use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

fn relation(card_id: &str, priority: Option<i32>, is_learned: bool) -> CardRelation {
    CardRelation {
        relation_id: format!("rel-{card_id}"),
        card_id: card_id.to_string(),
        question: format!("question {card_id}"),
        answer: format!("answer {card_id}"),
        is_learned,
        priority,
    }
}

fn active_session(relations: &[CardRelation]) -> ReviewSession {
    let mut session = ReviewSession::new("collection-1");
    session.load(build_queue(relations, &mut StdRng::seed_from_u64(7)));
    session
}

/// Records every write and optionally refuses them
#[derive(Default)]
struct RecordingStore {
    writes: Mutex<Vec<(String, String, bool)>>,
    refuse_with: Option<AccessError>,
}

impl ProgressStore for RecordingStore {
    async fn write_learned_status(&self, collection_id: &str, card_id: &str, is_learned: bool) -> Result<(), AccessError> {
        if let Some(e) = &self.refuse_with {
            return Err(e.clone());
        }
        self.writes
            .lock()
            .unwrap()
            .push((collection_id.to_string(), card_id.to_string(), is_learned));
        Ok(())
    }
}

struct FixedSource(Result<Vec<CardRelation>, AccessError>);

impl RelationSource for FixedSource {
    async fn fetch_collection_relations(&self, _collection_id: &str) -> Result<Vec<CardRelation>, AccessError> {
        self.0.clone()
    }
}

#[test]
fn test_weight_defaults_and_raw_values() {
    assert_eq!(relation("a", None, false).weight(), 1);
    assert_eq!(relation("a", Some(0), false).weight(), 1);
    assert_eq!(relation("a", Some(4), false).weight(), 4);
    assert_eq!(relation("a", Some(-2), false).weight(), -2);
}

#[test]
fn test_relation_from_wire_format() {
    let json = serde_json::json!({
        "id": "rel-9",
        "flashCard": { "id": "card-9", "question": "Q", "answer": "A" },
        "isLearned": true,
        "priority": 2
    });
    let dto: crate::dto::RelationDto = serde_json::from_value(json).unwrap();
    let relation = CardRelation::from(dto);

    assert_eq!(relation.relation_id, "rel-9");
    assert_eq!(relation.card_id, "card-9");
    assert_eq!(relation.question, "Q");
    assert_eq!(relation.answer, "A");
    assert!(relation.is_learned);
    assert_eq!(relation.priority, Some(2));
}

#[test]
fn test_relation_from_wire_format_without_optional_fields() {
    let json = serde_json::json!({
        "id": "rel-1",
        "flashCard": { "id": "card-1", "question": "Q", "answer": "A" }
    });
    let dto: crate::dto::RelationDto = serde_json::from_value(json).unwrap();
    let relation = CardRelation::from(dto);

    assert!(!relation.is_learned);
    assert_eq!(relation.priority, None);
    assert_eq!(relation.weight(), 1);
}

#[test]
fn test_weighted_card_fills_queue_and_learned_card_is_dropped() {
    let relations = vec![relation("1", Some(3), false), relation("2", Some(1), true)];

    let queue = build_queue(&relations, &mut StdRng::seed_from_u64(1));

    assert_eq!(queue.len(), 3);
    assert!(queue.iter().all(|card| card.id == "1"));
    assert!(queue.iter().all(|card| card.priority == 3 && card.relation_id == "rel-1"));
}

#[test]
fn test_negative_priority_contributes_nothing() {
    let relations = vec![relation("1", Some(-3), false), relation("2", None, false)];

    let queue = build_queue(&relations, &mut StdRng::seed_from_u64(1));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.get(0).unwrap().id, "2");
}

#[test]
fn test_fully_learned_collection_is_empty_never_active() {
    let relations = vec![relation("1", Some(2), true), relation("2", None, true)];
    let session = active_session(&relations);

    assert_eq!(session.state(), &SessionState::Empty);
    assert!(session.current().is_none());
}

#[test]
fn test_empty_collection_is_empty() {
    let session = active_session(&[]);
    assert_eq!(session.state(), &SessionState::Empty);
}

#[test]
fn test_single_card_next_finishes() {
    let mut session = active_session(&[relation("1", Some(1), false)]);

    assert_eq!(session.state(), &SessionState::Active { position: 0, flipped: false });
    assert_eq!(session.next(), Outcome::Completed);
    assert_eq!(session.state(), &SessionState::Finished);
    assert!(session.current().is_none());
}

#[test]
fn test_flip_next_previous() {
    let mut session = active_session(&[relation("1", Some(1), false), relation("2", Some(2), false)]);
    assert_eq!(session.progress(), Some((1, 3)));

    assert_eq!(session.flip(), Outcome::Continue);
    assert!(session.is_flipped());
    assert_eq!(session.flip(), Outcome::Continue);
    assert!(!session.is_flipped());

    session.flip();
    assert_eq!(session.next(), Outcome::Continue);
    assert_eq!(session.state(), &SessionState::Active { position: 1, flipped: false });

    session.flip();
    assert_eq!(session.previous(), Outcome::Continue);
    assert_eq!(session.state(), &SessionState::Active { position: 0, flipped: false });
}

#[test]
fn test_previous_at_start_only_resets_flip() {
    let mut session = active_session(&[relation("1", Some(2), false)]);

    session.flip();
    assert_eq!(session.previous(), Outcome::Continue);
    assert_eq!(session.state(), &SessionState::Active { position: 0, flipped: false });
}

#[test]
fn test_terminal_states_ignore_commands() {
    let mut finished = active_session(&[relation("1", None, false)]);
    finished.next();

    let mut empty = active_session(&[]);

    let mut failed = ReviewSession::new("collection-1");
    failed.fail(&StudyError::Fetch(AccessError::Forbidden));

    for session in [&mut finished, &mut empty, &mut failed] {
        let before = session.state().clone();
        assert!(before.is_terminal());
        assert_eq!(session.flip(), Outcome::Ignored);
        assert_eq!(session.next(), Outcome::Ignored);
        assert_eq!(session.previous(), Outcome::Ignored);
        assert!(session.begin_toggle().is_none());
        assert_eq!(session.state(), &before);
    }
}

#[test]
fn test_loading_ignores_navigation_and_second_load() {
    let mut session = ReviewSession::new("collection-1");

    assert_eq!(session.next(), Outcome::Ignored);
    assert_eq!(session.flip(), Outcome::Ignored);
    assert_eq!(session.state(), &SessionState::Loading);

    session.load(StudyQueue::default());
    assert_eq!(session.load(StudyQueue::default()), Outcome::Ignored);
    assert_eq!(session.fail(&StudyError::Fetch(AccessError::NotFound)), Outcome::Ignored);
    assert_eq!(session.state(), &SessionState::Empty);
}

#[test]
fn test_load_failure_carries_reason() {
    let mut session = ReviewSession::new("collection-1");
    session.fail(&StudyError::Fetch(AccessError::Transport("connection refused".to_string())));

    match session.state() {
        SessionState::LoadFailed { reason } => assert!(reason.contains("connection refused")),
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test]
async fn test_toggle_updates_every_slot_of_the_card() {
    let mut session = active_session(&[relation("1", Some(3), false), relation("2", Some(2), false)]);
    let store = RecordingStore::default();

    let target = session.current().unwrap().id.clone();
    let outcome = session.toggle_learned(&store).await.unwrap();

    assert_eq!(outcome, Outcome::Continue);
    assert_eq!(
        store.writes.lock().unwrap().as_slice(),
        &[("collection-1".to_string(), target.clone(), true)]
    );

    let (toggled, others): (Vec<_>, Vec<_>) = session.queue().iter().partition(|card| card.id == target);
    assert!(toggled.iter().all(|card| card.is_learned));
    assert!(others.iter().all(|card| !card.is_learned));
    assert_eq!(session.state(), &SessionState::Active { position: 0, flipped: false });
}

#[tokio::test]
async fn test_toggle_twice_restores_unlearned() {
    let mut session = active_session(&[relation("1", Some(2), false)]);
    let store = RecordingStore::default();

    session.toggle_learned(&store).await.unwrap();
    session.toggle_learned(&store).await.unwrap();

    assert!(session.queue().iter().all(|card| !card.is_learned));
    let writes = store.writes.lock().unwrap();
    assert_eq!(writes.len(), 2);
    assert!(writes[0].2);
    assert!(!writes[1].2);
}

#[tokio::test]
async fn test_failed_toggle_leaves_queue_untouched() {
    let mut session = active_session(&[relation("1", Some(3), false)]);
    let before = session.queue().clone();
    let store = RecordingStore {
        refuse_with: Some(AccessError::Forbidden),
        ..Default::default()
    };

    let result = session.toggle_learned(&store).await;

    assert_eq!(result, Err(StudyError::Write(AccessError::Forbidden)));
    assert_eq!(session.queue(), &before);
    assert_eq!(session.next(), Outcome::Continue);
}

#[tokio::test]
async fn test_toggle_when_not_active_is_ignored() {
    let mut session = active_session(&[]);
    let store = RecordingStore::default();

    assert_eq!(session.toggle_learned(&store).await.unwrap(), Outcome::Ignored);
    assert!(store.writes.lock().unwrap().is_empty());
}

#[test]
fn test_apply_toggle_for_other_collection_is_ignored() {
    let mut session = active_session(&[relation("1", Some(2), false)]);

    let toggle = LearnedToggle {
        collection_id: "collection-2".to_string(),
        card_id: "1".to_string(),
        is_learned: true,
    };

    assert_eq!(session.apply_toggle(&toggle), 0);
    assert!(session.queue().iter().all(|card| !card.is_learned));
}

#[test]
fn test_loader_discards_superseded_results() {
    let mut loader = QueueLoader::new();
    let mut rng = StdRng::seed_from_u64(3);

    let first = loader.begin("collection-a");
    let second = loader.begin("collection-b");

    assert!(!loader.is_current(&first));
    assert!(loader.is_current(&second));

    assert!(loader.complete(first, Ok(vec![relation("1", None, false)]), &mut rng).is_none());

    let session = loader.complete(second, Ok(vec![relation("2", None, false)]), &mut rng).unwrap();
    assert_eq!(session.collection_id(), "collection-b");
    assert_eq!(session.current().unwrap().id, "2");
}

#[test]
fn test_loader_turns_fetch_error_into_failed_session() {
    let mut loader = QueueLoader::new();
    let ticket = loader.begin("collection-a");

    let session = loader
        .complete(ticket, Err(AccessError::NotFound), &mut StdRng::seed_from_u64(3))
        .unwrap();

    assert!(matches!(session.state(), SessionState::LoadFailed { .. }));
}

#[tokio::test]
async fn test_start_session_from_source() {
    let mut loader = QueueLoader::new();
    let source = FixedSource(Ok(vec![relation("1", Some(2), false), relation("2", None, true)]));

    let session = loader
        .start_session(&source, "collection-1", &mut StdRng::seed_from_u64(5))
        .await
        .unwrap();

    assert_eq!(session.queue().len(), 2);
    assert_eq!(session.progress(), Some((1, 2)));
}

/// Every ordering of three distinct cards should come up about equally often
#[test]
fn test_shuffle_is_uniform() {
    let relations = vec![relation("a", None, false), relation("b", None, false), relation("c", None, false)];
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let trials = 6000;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..trials {
        let queue = build_queue(&relations, &mut rng);
        let order: String = queue.iter().map(|card| card.id.as_str()).collect();
        *counts.entry(order).or_default() += 1;
    }

    assert_eq!(counts.len(), 6);

    let expected = trials as f64 / 6.0;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();

    // 5 degrees of freedom, p = 0.0001
    assert!(chi_square < 25.7, "chi-square {} too large: {:?}", chi_square, counts);
}
