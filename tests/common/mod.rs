//! Shared test fixtures for the deckbuilder integration tests.
//!
//! Provides `setup_sample_store()` which opens an in-memory store whose card
//! catalog is loaded from NDJSON temp files, plus helpers for building cards,
//! lines and drafts by hand.

use deckbuilder::models::{
    Card, CardCategory, Creature, DeckDraft, DeckLine, Energy, LineRef, Trainer,
};
use deckbuilder::DeckStore;
use std::io::Write;
use tempfile::NamedTempFile;

/// Open an in-memory store with the sample catalog loaded.
///
/// Ids repeat across categories on purpose (creature 1, trainer 1 and
/// energy 1 are different cards), and a few names are printed under two ids.
pub fn setup_sample_store() -> DeckStore {
    let store = DeckStore::builder().in_memory().build().unwrap();

    // -- creatures ------------------------------------------------------------
    load(
        &store,
        CardCategory::Creature,
        &[
            serde_json::json!({
                "id": 1, "name": "Pikachu ex", "energy_type": "Lightning", "hp": 200,
                "image_url": "pikachu-ex.png", "regulation": "G", "expansion": "SV8"
            }),
            serde_json::json!({
                "id": 2, "name": "Raichu", "energy_type": "Lightning", "hp": 130,
                "image_url": "raichu.png", "regulation": "G", "expansion": "SV8"
            }),
            serde_json::json!({
                "id": 3, "name": "Pikachu ex", "energy_type": "Lightning", "hp": 200,
                "image_url": "pikachu-ex-promo.png", "regulation": "G", "expansion": "PROMO"
            }),
        ],
    );

    // -- trainers -------------------------------------------------------------
    load(
        &store,
        CardCategory::Trainer,
        &[
            serde_json::json!({
                "id": 1, "name": "Professor's Research", "trainer_type": "Supporter",
                "description": "Discard your hand and draw 7 cards.",
                "image_url": "research.png", "regulation": "G", "expansion": "SV1"
            }),
            serde_json::json!({
                "id": 2, "name": "Ultra Ball", "trainer_type": "Item",
                "description": "Search your deck for a creature.",
                "image_url": "ultra-ball.png", "regulation": "G", "expansion": "SV1"
            }),
            serde_json::json!({
                "id": 3, "name": "Prime Catcher", "trainer_type": "ACE SPEC Item",
                "description": "Switch in 1 of your opponent's benched creatures.",
                "image_url": "prime-catcher.png", "regulation": "H", "expansion": "SV5"
            }),
            serde_json::json!({
                "id": 4, "name": "Boss's Orders", "trainer_type": "Supporter",
                "description": "Switch in 1 of your opponent's benched creatures.",
                "image_url": "boss.png", "regulation": "G", "expansion": "SV2"
            }),
            serde_json::json!({
                "id": 5, "name": "Prime Catcher", "trainer_type": "ACE SPEC Item",
                "description": "Switch in 1 of your opponent's benched creatures.",
                "image_url": "prime-catcher-alt.png", "regulation": "H", "expansion": "SV5a"
            }),
        ],
    );

    // -- energies -------------------------------------------------------------
    load(
        &store,
        CardCategory::Energy,
        &[
            serde_json::json!({
                "id": 1, "name": "Basic Lightning Energy",
                "image_url": "lightning.png", "regulation": "G", "expansion": "SVE"
            }),
            serde_json::json!({
                "id": 2, "name": "Legacy Energy",
                "image_url": "legacy.png", "regulation": "H", "expansion": "SV6"
            }),
            serde_json::json!({
                "id": 3, "name": "Double Turbo Energy",
                "image_url": "double-turbo.png", "regulation": "G", "expansion": "SV3"
            }),
            serde_json::json!({
                "id": 4, "name": "Basic Fire Energy",
                "image_url": "fire.png", "regulation": "G", "expansion": "SVE"
            }),
        ],
    );

    store
}

/// Write rows as NDJSON to a temp file and import them into a category.
fn load(store: &DeckStore, category: CardCategory, rows: &[serde_json::Value]) {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{}", serde_json::to_string(row).unwrap()).unwrap();
    }
    file.flush().unwrap();

    let inserted = store
        .catalog()
        .import_ndjson(category, file.path().to_str().unwrap())
        .unwrap();
    assert_eq!(inserted, rows.len());
}

// ---------------------------------------------------------------------------
// Hand-built cards
// ---------------------------------------------------------------------------

pub fn creature(id: i64, name: &str) -> Card {
    Card::Creature(Creature {
        id,
        name: name.to_string(),
        energy_type: Some("Lightning".to_string()),
        hp: Some(120),
        image_url: format!("creature-{id}.png"),
        regulation: None,
        expansion: None,
    })
}

pub fn trainer(id: i64, name: &str) -> Card {
    Card::Trainer(Trainer {
        id,
        name: name.to_string(),
        trainer_type: "Item".to_string(),
        description: None,
        image_url: format!("trainer-{id}.png"),
        regulation: None,
        expansion: None,
        ace_spec: false,
    })
}

pub fn ace_spec_trainer(id: i64, name: &str) -> Card {
    Card::Trainer(Trainer {
        id,
        name: name.to_string(),
        trainer_type: "ACE SPEC Item".to_string(),
        description: None,
        image_url: format!("trainer-{id}.png"),
        regulation: None,
        expansion: None,
        ace_spec: true,
    })
}

pub fn energy(id: i64, name: &str) -> Card {
    Card::Energy(Energy {
        id,
        name: name.to_string(),
        image_url: format!("energy-{id}.png"),
        regulation: None,
        expansion: None,
        ace_spec: false,
    })
}

pub fn line(card: Card, quantity: u32) -> DeckLine {
    DeckLine::new(card, quantity)
}

/// Creature ×4, trainer ×4 and basic energy ×52, against the sample catalog.
pub fn valid_draft(name: &str) -> DeckDraft {
    DeckDraft {
        name: name.to_string(),
        description: "Lightning aggro".to_string(),
        cards: vec![
            LineRef::new(1, "creature", 4),
            LineRef::new(1, "trainer", 4),
            LineRef::new(1, "energy", 52),
        ],
        ..Default::default()
    }
}
