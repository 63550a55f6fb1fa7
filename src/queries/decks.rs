//! Deck persistence: the `decks` row and its `deck_cards` lines are written
//! together in one unit of work and read back into a [`Deck`].

use duckdb::params;
use duckdb::types::Value;
use serde::Deserialize;

use crate::connection::{Connection, UnitOfWork};
use crate::error::{DeckError, Operation, Result};
use crate::models::{Card, Deck, DeckLine};
use crate::queries::catalog::CardCatalog;
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// Stored rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DeckRow {
    id: i64,
    name: String,
    description: Option<String>,
    main_card_id: Option<i64>,
    main_card_category: Option<String>,
    sub_card_id: Option<i64>,
    sub_card_category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeckCardRow {
    card_id: i64,
    card_category: String,
    quantity: u32,
}

// ---------------------------------------------------------------------------
// DeckRepository
// ---------------------------------------------------------------------------

/// Stores and loads decks.
///
/// Writes are all-or-nothing: a failure at any statement rolls back the
/// whole operation, so a deck is never observable without its lines or with
/// a mix of old and new lines. Loaded decks are rebuilt with
/// [`Deck::trusted`] and are not re-validated.
///
/// Concurrent updates to the same deck are not detected; the last commit
/// replaces the deck in full.
pub struct DeckRepository<'a> {
    conn: &'a Connection,
}

impl<'a> DeckRepository<'a> {
    /// Create a new `DeckRepository` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Store a new deck with its lines and return it as reloaded from storage.
    ///
    /// Any id already set on `deck` is ignored; storage assigns a new one.
    pub fn create(&self, deck: &Deck) -> Result<Deck> {
        let id = self
            .insert(deck)
            .map_err(|e| e.during(Operation::Create))?;
        self.find_by_id(id)
    }

    /// Load every stored deck, ordered by id.
    pub fn find_all(&self) -> Result<Vec<Deck>> {
        let (sql, params) = SqlBuilder::new("decks")
            .select(&["id"])
            .order_by(&["id ASC"])
            .build();

        let ids: Vec<i64> = self
            .conn
            .execute(&sql, &params)
            .map_err(|e| e.during(Operation::Find))?
            .into_iter()
            .filter_map(|row| row.get("id").and_then(|v| v.as_i64()))
            .collect();

        ids.into_iter().map(|id| self.find_by_id(id)).collect()
    }

    /// Load one deck with its main card, sub card and lines.
    ///
    /// Fails with [`DeckError::NotFound`] when no deck has this id, and with
    /// [`DeckError::Persistence`] when a stored card no longer resolves.
    pub fn find_by_id(&self, id: i64) -> Result<Deck> {
        self.load(id).map_err(|e| e.during(Operation::Find))
    }

    /// Whether a deck row with this id exists. Its cards are not resolved.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let (sql, params) = SqlBuilder::new("decks")
            .select(&["id"])
            .where_eq("id", Value::BigInt(id))
            .limit(1)
            .build();
        let rows = self
            .conn
            .execute(&sql, &params)
            .map_err(|e| e.during(Operation::Find))?;
        Ok(!rows.is_empty())
    }

    /// Replace a stored deck's fields and its entire line list.
    ///
    /// Fails with [`DeckError::InvalidArgument`] when `deck` has no id and
    /// with [`DeckError::NotFound`] when no deck has that id.
    pub fn update(&self, deck: &Deck) -> Result<()> {
        let id = deck.id().ok_or_else(|| {
            DeckError::InvalidArgument("cannot update a deck that has not been stored".into())
        })?;
        self.replace(id, deck)
            .map_err(|e| e.during(Operation::Update))
    }

    /// Remove a deck and its lines. Removing an unknown id is not an error.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.remove(id).map_err(|e| e.during(Operation::Delete))
    }

    // -- Units of work -----------------------------------------------------

    fn insert(&self, deck: &Deck) -> Result<i64> {
        let uow = self.conn.begin()?;
        let (main_id, main_category) = card_key(deck.main_card());
        let (sub_id, sub_category) = card_key(deck.sub_card());

        let id = uow.insert_returning_id(
            "INSERT INTO decks \
             (name, description, main_card_id, main_card_category, sub_card_id, sub_card_category) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
            params![
                deck.name(),
                stored_description(deck),
                main_id,
                main_category,
                sub_id,
                sub_category
            ],
        )?;
        insert_lines(&uow, id, deck.lines())?;

        uow.commit()?;
        Ok(id)
    }

    fn replace(&self, id: i64, deck: &Deck) -> Result<()> {
        let uow = self.conn.begin()?;
        let (main_id, main_category) = card_key(deck.main_card());
        let (sub_id, sub_category) = card_key(deck.sub_card());

        let changed = uow.execute(
            "UPDATE decks SET name = ?, description = ?, \
             main_card_id = ?, main_card_category = ?, \
             sub_card_id = ?, sub_card_category = ? \
             WHERE id = ?",
            params![
                deck.name(),
                stored_description(deck),
                main_id,
                main_category,
                sub_id,
                sub_category,
                id
            ],
        )?;
        if changed == 0 {
            uow.rollback()?;
            return Err(DeckError::NotFound(format!("deck {} does not exist", id)));
        }

        uow.execute("DELETE FROM deck_cards WHERE deck_id = ?", params![id])?;
        insert_lines(&uow, id, deck.lines())?;

        uow.commit()
    }

    fn remove(&self, id: i64) -> Result<()> {
        let uow = self.conn.begin()?;
        uow.execute("DELETE FROM deck_cards WHERE deck_id = ?", params![id])?;
        uow.execute("DELETE FROM decks WHERE id = ?", params![id])?;
        uow.commit()
    }

    // -- Reconstruction ----------------------------------------------------

    fn load(&self, id: i64) -> Result<Deck> {
        let (sql, params) = SqlBuilder::new("decks")
            .where_eq("id", Value::BigInt(id))
            .limit(1)
            .build();
        let row = self
            .conn
            .execute_into::<DeckRow>(&sql, &params)?
            .into_iter()
            .next()
            .ok_or_else(|| DeckError::NotFound(format!("deck {} does not exist", id)))?;

        let (sql, params) = SqlBuilder::new("deck_cards")
            .select(&["card_id", "card_category", "quantity"])
            .where_eq("deck_id", Value::BigInt(row.id))
            .order_by(&["position ASC"])
            .build();
        let line_rows = self.conn.execute_into::<DeckCardRow>(&sql, &params)?;

        let catalog = CardCatalog::new(self.conn);
        let main_card = resolve(&catalog, row.main_card_id, row.main_card_category.as_deref())
            .map_err(|e| broken_reference(id, e))?;
        let sub_card = resolve(&catalog, row.sub_card_id, row.sub_card_category.as_deref())
            .map_err(|e| broken_reference(id, e))?;

        let mut lines = Vec::with_capacity(line_rows.len());
        for line in line_rows {
            let card = catalog
                .find_card_by_tag(line.card_id, &line.card_category)
                .map_err(|e| broken_reference(id, e))?;
            lines.push(DeckLine::new(card, line.quantity));
        }

        Ok(Deck::trusted(
            Some(row.id),
            row.name,
            row.description.unwrap_or_default(),
            main_card,
            sub_card,
            lines,
        ))
    }
}

/// Id and category tag to store for an optional featured card.
fn card_key(card: Option<&Card>) -> (Option<i64>, Option<&'static str>) {
    match card {
        Some(c) => (Some(c.id()), Some(c.category().as_str())),
        None => (None, None),
    }
}

/// Empty descriptions are stored as NULL.
fn stored_description(deck: &Deck) -> Option<&str> {
    Some(deck.description()).filter(|d| !d.is_empty())
}

fn insert_lines(uow: &UnitOfWork<'_>, deck_id: i64, lines: &[DeckLine]) -> Result<()> {
    for (position, line) in lines.iter().enumerate() {
        uow.execute(
            "INSERT INTO deck_cards (deck_id, position, card_id, card_category, quantity) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                deck_id,
                position as i64,
                line.card().id(),
                line.card().category().as_str(),
                i64::from(line.quantity())
            ],
        )?;
    }
    Ok(())
}

/// A stored card that no longer resolves is a fault in the stored data, not
/// in the caller's request.
fn broken_reference(deck_id: i64, err: DeckError) -> DeckError {
    match err {
        DeckError::NotFound(msg) => {
            DeckError::Internal(format!("deck {} references a missing card: {}", deck_id, msg))
        }
        DeckError::InvalidCategory(tag) => DeckError::Internal(format!(
            "deck {} references unknown card category {:?}",
            deck_id, tag
        )),
        other => other,
    }
}

/// A featured card is only stored when both its id and category are present.
fn resolve(catalog: &CardCatalog<'_>, id: Option<i64>, category: Option<&str>) -> Result<Option<Card>> {
    match (id, category) {
        (Some(id), Some(tag)) => catalog.find_card_by_tag(id, tag).map(Some),
        _ => Ok(None),
    }
}
