//! End-to-end session tests against the SQLite store

use verdict_domain::{AssignmentRow, Decision, Example, ExampleId, SurveyStore};
use verdict_session::{DecisionOutcome, SessionError, SessionPhase, SessionRegistry, SessionState};
use verdict_store::SqliteStore;

fn seeded_store() -> SqliteStore {
    let mut store = SqliteStore::new(":memory:").unwrap();
    store
        .insert_example(&Example::from_slots(ExampleId::new(7), "C7", ["s1", "s2"]).unwrap())
        .unwrap();
    store
        .insert_example(&Example::from_slots(ExampleId::new(3), "C3", ["s1"]).unwrap())
        .unwrap();
    store.insert_assignment(&AssignmentRow::new("user_1", "[7, 3]")).unwrap();
    store.insert_assignment(&AssignmentRow::new("user_2", "[7, x]")).unwrap();
    store
}

#[test]
fn test_full_session_round_trip() {
    let mut store = seeded_store();
    let catalog = store.load_catalog().unwrap();

    let mut session = SessionState::new();
    assert_eq!(session.login("user_1", &catalog).unwrap(), SessionPhase::AwaitingDecision);

    let example = session.current_example(&catalog).unwrap().unwrap();
    assert_eq!(example.claim, "C7");
    assert_eq!(example.evidence, vec!["s1", "s2"]);

    session.record_decision(Decision::Support, &catalog).unwrap();
    assert_eq!(session.current_index(), 1);

    let outcome = session.record_decision(Decision::Refute, &catalog).unwrap();
    assert!(matches!(
        outcome,
        DecisionOutcome::Recorded {
            phase: SessionPhase::Complete,
            ..
        }
    ));

    let buffered = session.answers().to_vec();
    assert_eq!(session.flush(&mut store).unwrap(), 2);
    assert!(session.answers().is_empty());

    let results = store.load_results().unwrap();
    assert_eq!(results, buffered);
    assert_eq!(results[0].example_id, ExampleId::new(7));
    assert_eq!(results[0].claim, "C7");
    assert_eq!(results[0].decision, Decision::Support);
    assert_eq!(results[1].example_id, ExampleId::new(3));
    assert_eq!(results[1].decision, Decision::Refute);
    assert!(results[0].timestamp <= results[1].timestamp);
}

#[test]
fn test_unknown_and_malformed_users() {
    let store = seeded_store();
    let catalog = store.load_catalog().unwrap();
    let mut registry = SessionRegistry::new();

    assert!(matches!(
        registry.login("user_99", &catalog),
        Err(SessionError::UserNotFound(_))
    ));
    assert!(matches!(
        registry.login("user_2", &catalog),
        Err(SessionError::MalformedAssignment { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_partial_flushes_accumulate_in_results() {
    let mut store = seeded_store();
    let catalog = store.load_catalog().unwrap();
    let mut registry = SessionRegistry::new();

    let session = registry.login("user_1", &catalog).unwrap().unwrap();
    session.record_decision(Decision::CannotDecide, &catalog).unwrap();
    session.flush(&mut store).unwrap();
    session.record_decision(Decision::Support, &catalog).unwrap();
    assert_eq!(registry.pending_users(), vec!["user_1"]);

    let session = registry.get_mut("user_1").unwrap();
    session.flush(&mut store).unwrap();

    assert!(registry.pending_users().is_empty());
    assert_eq!(store.count_results_for_user("user_1").unwrap(), 2);
}
