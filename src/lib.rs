//! Deck building for a 60-card trading card game.
//!
//! Cards come from a catalog of creatures, trainers and energies. Decks are
//! checked against the deck rules when they are built and stored, together
//! with their card lines, in a DuckDB database.
//!
//! # Quick start
//!
//! ```no_run
//! use deckbuilder::models::{DeckDraft, LineRef};
//! use deckbuilder::DeckStore;
//!
//! let store = DeckStore::builder().database_path("decks.duckdb").build().unwrap();
//!
//! let draft = DeckDraft {
//!     name: "Lightning".into(),
//!     cards: vec![
//!         LineRef::new(1, "creature", 4),
//!         LineRef::new(1, "trainer", 4),
//!         LineRef::new(1, "energy", 52),
//!     ],
//!     ..Default::default()
//! };
//! let deck = store.service().create(&draft).unwrap();
//! println!("stored deck {:?}", deck.id());
//!
//! store.close();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod queries;
pub mod service;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncDeckStore;
pub use connection::{Connection, UnitOfWork};
pub use error::{DeckError, Operation, Result};
pub use service::DeckService;
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// DeckStoreBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and opening a [`DeckStore`].
///
/// Use [`DeckStore::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DeckStoreBuilder::build) to open the store.
#[derive(Debug, Default)]
pub struct DeckStoreBuilder {
    database_path: Option<PathBuf>,
    in_memory: bool,
}

impl DeckStoreBuilder {
    /// Store decks in this database file.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/deckbuilder/decks.duckdb` on Linux).
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Keep everything in memory. Nothing outlives the store.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Open the database and create any missing tables.
    pub fn build(self) -> Result<DeckStore> {
        let conn = if self.in_memory {
            Connection::open_in_memory()?
        } else {
            let path = self.database_path.unwrap_or_else(config::default_database_path);
            Connection::open(path)?
        };
        Ok(DeckStore { conn })
    }
}

// ---------------------------------------------------------------------------
// DeckStore
// ---------------------------------------------------------------------------

/// The storage handle: opened once at startup, passed to whoever needs it,
/// and closed at shutdown.
///
/// Exposes the catalog, the deck repository and the deck use cases as
/// lightweight wrappers borrowing the underlying [`Connection`].
pub struct DeckStore {
    conn: Connection,
}

impl DeckStore {
    /// Create a new builder for configuring the store.
    pub fn builder() -> DeckStoreBuilder {
        DeckStoreBuilder::default()
    }

    /// Card lookups by id and category.
    pub fn catalog(&self) -> queries::CardCatalog<'_> {
        queries::CardCatalog::new(&self.conn)
    }

    /// Direct deck persistence, without rule checks on input.
    pub fn decks(&self) -> queries::DeckRepository<'_> {
        queries::DeckRepository::new(&self.conn)
    }

    /// Create, update, delete, list and dry-run validate decks.
    pub fn service(&self) -> DeckService<'_> {
        DeckService::new(&self.conn)
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the store and release the database.
    ///
    /// Dropping the store has the same effect; this makes the end of its
    /// lifetime explicit.
    pub fn close(self) {
        drop(self);
    }
}

impl fmt::Display for DeckStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.conn.path() {
            Some(path) => write!(f, "DeckStore(database={})", path.display()),
            None => write!(f, "DeckStore(database=:memory:)"),
        }
    }
}
