//! Card catalog lookups against the `creatures`, `trainers` and `energies` tables.

use duckdb::types::Value;

use crate::connection::Connection;
use crate::error::{DeckError, Result};
use crate::models::{Card, CardCategory, Creature, Energy, Trainer};
use crate::sql_builder::SqlBuilder;

// ---------------------------------------------------------------------------
// CardCatalog
// ---------------------------------------------------------------------------

/// Read-only view of the card catalog.
///
/// Ids are only unique within a category, so every lookup names one. The
/// ace-spec flag of each returned card is resolved here from
/// [`config`](crate::config).
pub struct CardCatalog<'a> {
    conn: &'a Connection,
}

impl<'a> CardCatalog<'a> {
    /// Create a new `CardCatalog` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // -- Single card lookup ------------------------------------------------

    /// Resolve a card by id within one category.
    ///
    /// Fails with [`DeckError::NotFound`] when the category's table has no
    /// row for `id`.
    pub fn find_card_by_id(&self, id: i64, category: CardCategory) -> Result<Card> {
        let (sql, params) = SqlBuilder::new(category.table())
            .where_eq("id", Value::BigInt(id))
            .limit(1)
            .build();

        self.query(category, &sql, &params)?
            .into_iter()
            .next()
            .ok_or_else(|| DeckError::NotFound(format!("{} card {} does not exist", category, id)))
    }

    /// Resolve a card by id and a raw category tag.
    ///
    /// Fails with [`DeckError::InvalidCategory`] before touching storage
    /// when the tag is not one of `creature`, `trainer` or `energy`.
    pub fn find_card_by_tag(&self, id: i64, tag: &str) -> Result<Card> {
        let category: CardCategory = tag.parse()?;
        self.find_card_by_id(id, category)
    }

    // -- Browsing ----------------------------------------------------------

    /// Cards of one category whose name contains `fragment`, ignoring case,
    /// ordered by id.
    pub fn search_by_name(
        &self,
        category: CardCategory,
        fragment: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Card>> {
        let mut qb = SqlBuilder::new(category.table());
        qb.where_contains("name", fragment).order_by(&["id ASC"]);
        if let Some(n) = limit {
            qb.limit(n);
        }

        let (sql, params) = qb.build();
        self.query(category, &sql, &params)
    }

    /// Number of cards stored for a category.
    pub fn count(&self, category: CardCategory) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", category.table());
        let count = self
            .conn
            .execute_scalar(&sql, &[])?
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        Ok(count as usize)
    }

    // -- Loading -----------------------------------------------------------

    /// Append the cards of a newline-delimited JSON file to a category's
    /// table. Returns the number of cards inserted.
    pub fn import_ndjson(&self, category: CardCategory, ndjson_path: &str) -> Result<usize> {
        self.conn.import_ndjson(category.table(), ndjson_path)
    }

    /// Run a SELECT against a category table and decode the rows.
    fn query(&self, category: CardCategory, sql: &str, params: &[Value]) -> Result<Vec<Card>> {
        let cards = match category {
            CardCategory::Creature => self
                .conn
                .execute_into::<Creature>(sql, params)?
                .into_iter()
                .map(Card::from)
                .collect(),
            CardCategory::Trainer => self
                .conn
                .execute_into::<Trainer>(sql, params)?
                .into_iter()
                .map(|t| Card::from(t.with_resolved_ace_spec()))
                .collect(),
            CardCategory::Energy => self
                .conn
                .execute_into::<Energy>(sql, params)?
                .into_iter()
                .map(|e| Card::from(e.with_resolved_ace_spec()))
                .collect(),
        };
        Ok(cards)
    }
}
