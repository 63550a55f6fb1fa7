use std::collections::HashSet;
use std::path::PathBuf;

pub const DATABASE_FILE: &str = "decks.duckdb";

/// Substring that marks an energy card as basic. Basic energies are exempt
/// from the per-name copy limit.
pub const BASIC_ENERGY_MARKER: &str = "Basic";

/// Trainer types that carry the ace-spec rule.
pub fn ace_spec_trainer_types() -> HashSet<&'static str> {
    HashSet::from(["ACE SPEC Item", "ACE SPEC Tool", "ACE SPEC Stadium"])
}

/// Energy cards printed with the ace-spec rule. There is no ace-spec column
/// in the catalog tables, so the names are listed here.
pub fn ace_spec_energy_names() -> HashSet<&'static str> {
    HashSet::from(["Legacy Energy", "Rich Energy", "Neo Upper Energy"])
}

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("deckbuilder").join(DATABASE_FILE)
    } else {
        PathBuf::from(".deckbuilder").join(DATABASE_FILE)
    }
}
