use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};

use super::card::Card;

/// Number of cards a deck must contain.
pub const DECK_SIZE: u64 = 60;
/// Copies allowed per card name, basic energies excepted.
pub const MAX_COPIES: u64 = 4;
/// Copies allowed per ace-spec card name.
pub const MAX_ACE_SPEC_COPIES: u64 = 1;

// ---------------------------------------------------------------------------
// ValidationError: one variant per deck invariant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("deck name is required")]
    EmptyName,

    #[error("deck must contain exactly 60 cards, found {total}")]
    WrongTotal { total: u64 },

    #[error("{name} has 5+ copies registered (found {count})")]
    TooManyCopies { name: String, count: u64 },

    #[error("ace spec: {name} is registered more than once")]
    AceSpecDuplicated { name: String },

    #[error("main card: {name} is not included in the deck")]
    MainCardNotIncluded { name: String },

    #[error("sub card: {name} is not included in the deck")]
    SubCardNotIncluded { name: String },

    #[error("{name} is listed with a quantity of 0")]
    ZeroQuantity { name: String },
}

/// The violations collected by one construction attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|e| e.to_string()).collect()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

/// Serialized as the list of messages.
impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|e| e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DeckLine
// ---------------------------------------------------------------------------

/// A card and how many copies of it the deck holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckLine {
    card: Card,
    quantity: u32,
    ace_spec: bool,
}

impl DeckLine {
    /// The card's ace-spec flag is captured here, at construction.
    pub fn new(card: Card, quantity: u32) -> Self {
        let ace_spec = card.is_ace_spec();
        Self {
            card,
            quantity,
            ace_spec,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_ace_spec(&self) -> bool {
        self.ace_spec
    }
}

// ---------------------------------------------------------------------------
// Deck: the aggregate root
// ---------------------------------------------------------------------------

/// A named list of cards with an optional featured main and sub card.
///
/// Decks are immutable once built. There are two ways in:
///
/// - [`Deck::new`] checks every deck rule and is the only path for decks
///   about to be written.
/// - [`Deck::trusted`] skips the checks and is used when loading rows that
///   were validated when they were written. Rule changes are therefore not
///   applied retroactively: a stored deck that no longer satisfies the
///   current rules still loads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    id: Option<i64>,
    name: String,
    description: String,
    main_card: Option<Card>,
    sub_card: Option<Card>,
    lines: Vec<DeckLine>,
}

impl Deck {
    /// Build a deck and check it against the deck rules.
    ///
    /// All violations are collected; the deck is only returned when there
    /// are none. `id` is `None` for a deck that has not been stored yet.
    pub fn new(
        id: Option<i64>,
        name: impl Into<String>,
        description: impl Into<String>,
        main_card: Option<Card>,
        sub_card: Option<Card>,
        lines: Vec<DeckLine>,
    ) -> Result<Self, ValidationErrors> {
        let deck = Self::trusted(id, name, description, main_card, sub_card, lines);
        let errors = deck.validate();
        if errors.is_empty() {
            Ok(deck)
        } else {
            Err(errors)
        }
    }

    /// Build a deck without checking any rule.
    pub fn trusted(
        id: Option<i64>,
        name: impl Into<String>,
        description: impl Into<String>,
        main_card: Option<Card>,
        sub_card: Option<Card>,
        lines: Vec<DeckLine>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            main_card,
            sub_card,
            lines,
        }
    }

    /// Check the deck rules and return every violation, in the order found.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(ValidationError::EmptyName);
        }

        let total = self.total_cards();
        if total != DECK_SIZE {
            errors.push(ValidationError::WrongTotal { total });
        }

        let mut counts: HashMap<&str, u64> = HashMap::new();
        let mut over_limit: HashSet<&str> = HashSet::new();
        let mut ace_spec_reported: HashSet<&str> = HashSet::new();

        for line in &self.lines {
            let name = line.card.name();
            if line.quantity == 0 {
                errors.push(ValidationError::ZeroQuantity {
                    name: name.to_string(),
                });
            }
            if line.card.is_basic_energy() {
                continue;
            }

            let count = counts.entry(name).or_insert(0);
            *count += u64::from(line.quantity);
            let count = *count;

            if line.ace_spec && count > MAX_ACE_SPEC_COPIES && ace_spec_reported.insert(name) {
                errors.push(ValidationError::AceSpecDuplicated {
                    name: name.to_string(),
                });
            }
            if count > MAX_COPIES && over_limit.insert(name) {
                errors.push(ValidationError::TooManyCopies {
                    name: name.to_string(),
                    count: self.copies_of(name),
                });
            }
        }

        // Membership looks at every line, basic energies included
        let ids: HashSet<i64> = self.lines.iter().map(|l| l.card.id()).collect();
        if let Some(main) = &self.main_card {
            if !ids.contains(&main.id()) {
                errors.push(ValidationError::MainCardNotIncluded {
                    name: main.name().to_string(),
                });
            }
        }
        if let Some(sub) = &self.sub_card {
            if !ids.contains(&sub.id()) {
                errors.push(ValidationError::SubCardNotIncluded {
                    name: sub.name().to_string(),
                });
            }
        }

        errors.into()
    }

    // -- Accessors ---------------------------------------------------------

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn main_card(&self) -> Option<&Card> {
        self.main_card.as_ref()
    }

    pub fn sub_card(&self) -> Option<&Card> {
        self.sub_card.as_ref()
    }

    pub fn lines(&self) -> &[DeckLine] {
        &self.lines
    }

    /// Sum of all line quantities. Summed in `u64` so that no combination
    /// of `u32` quantities can wrap around to a valid total.
    pub fn total_cards(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Cumulative quantity of every line whose card has this name.
    pub fn copies_of(&self, name: &str) -> u64 {
        self.lines
            .iter()
            .filter(|l| l.card.name() == name)
            .map(|l| u64::from(l.quantity))
            .sum()
    }
}
