//! Deck use cases: turn caller drafts into validated decks and store them.
//!
//! Every card reference in a draft is resolved through the catalog before
//! any deck is built. A bad category tag or a missing card aborts the call
//! immediately; rule violations are collected and returned together.

use crate::connection::Connection;
use crate::error::{DeckError, Result};
use crate::models::{Card, CardRef, Deck, DeckDraft, DeckLine, ValidationReport};
use crate::queries::{CardCatalog, DeckRepository};

/// The deck use cases, bound to one connection.
pub struct DeckService<'a> {
    catalog: CardCatalog<'a>,
    repository: DeckRepository<'a>,
}

/// A draft whose card references have all been resolved.
struct ResolvedDraft {
    main_card: Option<Card>,
    sub_card: Option<Card>,
    lines: Vec<DeckLine>,
}

impl<'a> DeckService<'a> {
    /// Create a new `DeckService` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            catalog: CardCatalog::new(conn),
            repository: DeckRepository::new(conn),
        }
    }

    /// Validate and store a new deck, returning it as stored.
    pub fn create(&self, draft: &DeckDraft) -> Result<Deck> {
        let deck = self.build(None, draft)?;
        self.repository.create(&deck)
    }

    /// Replace the deck `id` with the contents of `draft`.
    ///
    /// Fails with [`DeckError::NotFound`] before resolving anything when the
    /// deck does not exist.
    pub fn update(&self, id: i64, draft: &DeckDraft) -> Result<Deck> {
        self.ensure_exists(id)?;
        let deck = self.build(Some(id), draft)?;
        self.repository.update(&deck)?;
        self.repository.find_by_id(id)
    }

    /// Delete the deck `id`, failing with [`DeckError::NotFound`] when it
    /// does not exist.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.ensure_exists(id)?;
        self.repository.delete(id)
    }

    pub fn list(&self) -> Result<Vec<Deck>> {
        self.repository.find_all()
    }

    pub fn get(&self, id: i64) -> Result<Deck> {
        self.repository.find_by_id(id)
    }

    /// Check a draft against the deck rules without storing anything.
    ///
    /// Rule violations are reported in the returned [`ValidationReport`];
    /// only unresolvable card references are returned as errors.
    pub fn validate(&self, draft: &DeckDraft) -> Result<ValidationReport> {
        let resolved = self.resolve(draft)?;
        let deck = Deck::trusted(
            None,
            draft.name.as_str(),
            draft.description.as_str(),
            resolved.main_card,
            resolved.sub_card,
            resolved.lines,
        );
        Ok(deck.validate().into())
    }

    // -- Helpers -----------------------------------------------------------

    fn ensure_exists(&self, id: i64) -> Result<()> {
        if self.repository.exists(id)? {
            Ok(())
        } else {
            Err(DeckError::NotFound(format!("deck {} does not exist", id)))
        }
    }

    fn build(&self, id: Option<i64>, draft: &DeckDraft) -> Result<Deck> {
        let resolved = self.resolve(draft)?;
        Deck::new(
            id,
            draft.name.as_str(),
            draft.description.as_str(),
            resolved.main_card,
            resolved.sub_card,
            resolved.lines,
        )
        .map_err(DeckError::Validation)
    }

    fn resolve(&self, draft: &DeckDraft) -> Result<ResolvedDraft> {
        let main_card = self.resolve_ref(draft.main_card.as_ref())?;
        let sub_card = self.resolve_ref(draft.sub_card.as_ref())?;

        let mut lines = Vec::with_capacity(draft.cards.len());
        for line in &draft.cards {
            let card = self.catalog.find_card_by_tag(line.id, &line.category)?;
            lines.push(DeckLine::new(card, line.quantity));
        }

        Ok(ResolvedDraft {
            main_card,
            sub_card,
            lines,
        })
    }

    fn resolve_ref(&self, card: Option<&CardRef>) -> Result<Option<Card>> {
        card.map(|c| self.catalog.find_card_by_tag(c.id, &c.category))
            .transpose()
    }
}
