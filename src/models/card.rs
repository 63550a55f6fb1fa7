use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::DeckError;

// ---------------------------------------------------------------------------
// CardCategory: which catalog table a card id belongs to
// ---------------------------------------------------------------------------

/// Card ids are only unique within a category, so every stored id travels
/// with one of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    Creature,
    Trainer,
    Energy,
}

impl CardCategory {
    pub const ALL: [CardCategory; 3] = [
        CardCategory::Creature,
        CardCategory::Trainer,
        CardCategory::Energy,
    ];

    /// The tag written to storage and accepted from callers.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardCategory::Creature => "creature",
            CardCategory::Trainer => "trainer",
            CardCategory::Energy => "energy",
        }
    }

    /// The catalog table holding cards of this category.
    pub fn table(&self) -> &'static str {
        match self {
            CardCategory::Creature => "creatures",
            CardCategory::Trainer => "trainers",
            CardCategory::Energy => "energies",
        }
    }
}

impl fmt::Display for CardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardCategory {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "creature" => Ok(CardCategory::Creature),
            "trainer" => Ok(CardCategory::Trainer),
            "energy" => Ok(CardCategory::Energy),
            _ => Err(DeckError::InvalidCategory(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Card variants: one struct per catalog table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: i64,
    pub name: String,
    pub energy_type: Option<String>,
    pub hp: Option<i64>,
    pub image_url: String,
    pub regulation: Option<String>,
    pub expansion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: i64,
    pub name: String,
    pub trainer_type: String,
    pub description: Option<String>,
    pub image_url: String,
    pub regulation: Option<String>,
    pub expansion: Option<String>,
    /// Resolved by the catalog from the trainer type, not stored.
    #[serde(default)]
    pub ace_spec: bool,
}

impl Trainer {
    /// Recompute `ace_spec` from the configured ace-spec trainer types.
    pub fn with_resolved_ace_spec(mut self) -> Self {
        self.ace_spec = config::ace_spec_trainer_types().contains(self.trainer_type.as_str());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Energy {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    pub regulation: Option<String>,
    pub expansion: Option<String>,
    /// Resolved by the catalog from the energy name, not stored.
    #[serde(default)]
    pub ace_spec: bool,
}

impl Energy {
    /// Recompute `ace_spec` from the configured ace-spec energy names.
    pub fn with_resolved_ace_spec(mut self) -> Self {
        self.ace_spec = config::ace_spec_energy_names().contains(self.name.as_str());
        self
    }

    pub fn is_basic(&self) -> bool {
        self.name.contains(config::BASIC_ENERGY_MARKER)
    }
}

// ---------------------------------------------------------------------------
// Card: the closed union the deck aggregate works with
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Card {
    Creature(Creature),
    Trainer(Trainer),
    Energy(Energy),
}

impl Card {
    pub fn id(&self) -> i64 {
        match self {
            Card::Creature(c) => c.id,
            Card::Trainer(t) => t.id,
            Card::Energy(e) => e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Card::Creature(c) => &c.name,
            Card::Trainer(t) => &t.name,
            Card::Energy(e) => &e.name,
        }
    }

    pub fn category(&self) -> CardCategory {
        match self {
            Card::Creature(_) => CardCategory::Creature,
            Card::Trainer(_) => CardCategory::Trainer,
            Card::Energy(_) => CardCategory::Energy,
        }
    }

    pub fn image_url(&self) -> &str {
        match self {
            Card::Creature(c) => &c.image_url,
            Card::Trainer(t) => &t.image_url,
            Card::Energy(e) => &e.image_url,
        }
    }

    /// No creature currently carries the ace-spec rule.
    pub fn is_ace_spec(&self) -> bool {
        match self {
            Card::Creature(_) => false,
            Card::Trainer(t) => t.ace_spec,
            Card::Energy(e) => e.ace_spec,
        }
    }

    pub fn is_basic_energy(&self) -> bool {
        matches!(self, Card::Energy(e) if e.is_basic())
    }
}

impl From<Creature> for Card {
    fn from(c: Creature) -> Self {
        Card::Creature(c)
    }
}

impl From<Trainer> for Card {
    fn from(t: Trainer) -> Self {
        Card::Trainer(t)
    }
}

impl From<Energy> for Card {
    fn from(e: Energy) -> Self {
        Card::Energy(e)
    }
}
