//! Deck use cases: draft resolution, rule enforcement and dry-run validation.

mod common;

use deckbuilder::models::{CardRef, DeckDraft, LineRef, ValidationError};
use deckbuilder::DeckError;

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[test]
fn create_stores_a_valid_draft() {
    let store = common::setup_sample_store();
    let mut draft = common::valid_draft("Lightning");
    draft.main_card = Some(CardRef::new(1, "creature"));
    draft.sub_card = Some(CardRef::new(1, "energy"));

    let deck = store.service().create(&draft).unwrap();

    assert!(deck.id().is_some());
    assert_eq!(deck.name(), "Lightning");
    assert_eq!(deck.description(), "Lightning aggro");
    assert_eq!(deck.main_card().unwrap().name(), "Pikachu ex");
    assert_eq!(deck.sub_card().unwrap().name(), "Basic Lightning Energy");
    assert_eq!(deck.total_cards(), 60);
    assert_eq!(store.service().list().unwrap(), vec![deck]);
}

#[test]
fn create_reports_every_rule_violation_and_stores_nothing() {
    let store = common::setup_sample_store();
    let draft = DeckDraft {
        name: String::new(),
        main_card: Some(CardRef::new(3, "creature")),
        cards: vec![
            LineRef::new(2, "trainer", 5),
            LineRef::new(1, "energy", 50),
        ],
        ..Default::default()
    };

    let err = store.service().create(&draft).unwrap_err();
    let errors = match &err {
        DeckError::Validation(errors) => errors.clone(),
        other => panic!("expected validation errors, got {:?}", other),
    };
    assert!(err.is_client_error());

    assert_eq!(
        errors.into_vec(),
        vec![
            ValidationError::EmptyName,
            ValidationError::WrongTotal { total: 55 },
            ValidationError::TooManyCopies {
                name: "Ultra Ball".into(),
                count: 5,
            },
            ValidationError::MainCardNotIncluded {
                name: "Pikachu ex".into()
            },
        ]
    );
    assert!(store.service().list().unwrap().is_empty());
}

#[test]
fn create_aborts_on_unknown_category() {
    let store = common::setup_sample_store();
    let mut draft = common::valid_draft("Lightning");
    draft.cards.push(LineRef::new(1, "pokemon", 1));

    let err = store.service().create(&draft).unwrap_err();
    assert!(matches!(err, DeckError::InvalidCategory(ref tag) if tag == "pokemon"));
    assert!(store.service().list().unwrap().is_empty());
}

#[test]
fn create_aborts_on_missing_card() {
    let store = common::setup_sample_store();
    let mut draft = common::valid_draft("Lightning");
    draft.sub_card = Some(CardRef::new(42, "trainer"));

    let err = store.service().create(&draft).unwrap_err();
    assert!(matches!(err, DeckError::NotFound(_)));
}

#[test]
fn create_rejects_two_ace_specs() {
    let store = common::setup_sample_store();
    let draft = DeckDraft {
        name: "Catcher".into(),
        cards: vec![
            LineRef::new(3, "trainer", 1),
            LineRef::new(5, "trainer", 1),
            LineRef::new(2, "energy", 1),
            LineRef::new(1, "energy", 57),
        ],
        ..Default::default()
    };

    let err = store.service().create(&draft).unwrap_err();
    match err {
        DeckError::Validation(errors) => {
            assert_eq!(
                errors.into_vec(),
                vec![ValidationError::AceSpecDuplicated {
                    name: "Prime Catcher".into()
                }]
            );
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// update / delete / get
// ---------------------------------------------------------------------------

#[test]
fn update_replaces_the_stored_deck() {
    let store = common::setup_sample_store();
    let created = store.service().create(&common::valid_draft("Lightning")).unwrap();
    let id = created.id().unwrap();

    let draft = DeckDraft {
        name: "Fire".into(),
        main_card: Some(CardRef::new(2, "creature")),
        cards: vec![
            LineRef::new(2, "creature", 4),
            LineRef::new(4, "energy", 56),
        ],
        ..Default::default()
    };
    let updated = store.service().update(id, &draft).unwrap();

    assert_eq!(updated.id(), Some(id));
    assert_eq!(updated.name(), "Fire");
    assert_eq!(updated.description(), "");
    assert_eq!(updated.lines().len(), 2);
    assert_eq!(store.service().get(id).unwrap(), updated);
}

#[test]
fn update_missing_deck_is_not_found() {
    let store = common::setup_sample_store();
    let err = store
        .service()
        .update(9, &common::valid_draft("Ghost"))
        .unwrap_err();
    assert!(matches!(err, DeckError::NotFound(_)));
}

#[test]
fn update_with_rule_violations_keeps_the_old_deck() {
    let store = common::setup_sample_store();
    let created = store.service().create(&common::valid_draft("Lightning")).unwrap();
    let id = created.id().unwrap();

    let mut draft = common::valid_draft("Lightning");
    draft.cards.pop();

    let err = store.service().update(id, &draft).unwrap_err();
    assert!(matches!(err, DeckError::Validation(_)));
    assert_eq!(store.service().get(id).unwrap(), created);
}

#[test]
fn delete_removes_the_deck() {
    let store = common::setup_sample_store();
    let created = store.service().create(&common::valid_draft("Lightning")).unwrap();
    let id = created.id().unwrap();

    store.service().delete(id).unwrap();
    assert!(matches!(store.service().get(id), Err(DeckError::NotFound(_))));
}

#[test]
fn delete_missing_deck_is_not_found() {
    let store = common::setup_sample_store();
    let err = store.service().delete(31).unwrap_err();
    assert!(matches!(err, DeckError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_a_valid_draft() {
    let store = common::setup_sample_store();
    let report = store
        .service()
        .validate(&common::valid_draft("Lightning"))
        .unwrap();

    assert!(report.is_valid);
    assert!(report.errors.is_empty());
    assert!(store.service().list().unwrap().is_empty());
}

#[test]
fn validate_reports_violations_without_storing() {
    let store = common::setup_sample_store();
    let draft = DeckDraft {
        name: "Turbo".into(),
        cards: vec![
            LineRef::new(3, "energy", 5),
            LineRef::new(1, "energy", 54),
        ],
        ..Default::default()
    };

    let report = store.service().validate(&draft).unwrap();
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.contains(&ValidationError::WrongTotal { total: 59 }));
    assert!(store.service().list().unwrap().is_empty());
}

#[test]
fn validate_reports_huge_totals_instead_of_wrapping() {
    let store = common::setup_sample_store();
    let draft = DeckDraft {
        name: "Overflow".into(),
        cards: vec![
            LineRef::new(1, "energy", u32::MAX),
            LineRef::new(1, "energy", 61),
        ],
        ..Default::default()
    };

    let report = store.service().validate(&draft).unwrap();
    assert!(!report.is_valid);
    assert_eq!(
        report.errors.into_vec(),
        vec![ValidationError::WrongTotal {
            total: u64::from(u32::MAX) + 61
        }]
    );

    let err = store.service().create(&draft).unwrap_err();
    assert!(matches!(err, DeckError::Validation(_)));
}

#[test]
fn validate_fails_on_unresolvable_cards() {
    let store = common::setup_sample_store();
    let mut draft = common::valid_draft("Lightning");
    draft.main_card = Some(CardRef::new(1, "Pokemon"));

    let err = store.service().validate(&draft).unwrap_err();
    assert!(matches!(err, DeckError::InvalidCategory(_)));
}

#[test]
fn validation_report_serializes_messages() {
    let store = common::setup_sample_store();
    let mut draft = common::valid_draft("Lightning");
    draft.main_card = Some(CardRef::new(2, "creature"));

    let report = store.service().validate(&draft).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "is_valid": false,
            "errors": ["main card: Raichu is not included in the deck"]
        })
    );
}

#[test]
fn drafts_deserialize_from_json() {
    let draft: DeckDraft = serde_json::from_value(serde_json::json!({
        "name": "Lightning",
        "main_card": { "id": 1, "category": "creature" },
        "cards": [
            { "id": 1, "category": "creature", "quantity": 4 },
            { "id": 1, "category": "trainer", "quantity": 4 },
            { "id": 1, "category": "energy", "quantity": 52 }
        ]
    }))
    .unwrap();

    let store = common::setup_sample_store();
    let deck = store.service().create(&draft).unwrap();
    assert_eq!(deck.description(), "");
    assert_eq!(deck.main_card().unwrap().name(), "Pikachu ex");
}
