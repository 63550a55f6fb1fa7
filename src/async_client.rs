//! Async wrapper around [`DeckStore`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every store operation on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! # use deckbuilder::AsyncDeckStore;
//! # async fn example() -> deckbuilder::Result<()> {
//! let store = AsyncDeckStore::builder().in_memory().build().await?;
//!
//! let decks = store.run(|s| s.service().list()).await?;
//! println!("{} decks", decks.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{DeckError, Result};
use crate::models::{Deck, DeckDraft, ValidationReport};
use crate::DeckStore;

// ---------------------------------------------------------------------------
// AsyncDeckStoreBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and opening an [`AsyncDeckStore`].
#[derive(Debug, Default)]
pub struct AsyncDeckStoreBuilder {
    database_path: Option<PathBuf>,
    in_memory: bool,
}

impl AsyncDeckStoreBuilder {
    /// Store decks in this database file.
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Keep everything in memory.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    /// Open the store on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncDeckStore> {
        tokio::task::spawn_blocking(move || {
            let mut builder = DeckStore::builder();
            if let Some(path) = self.database_path {
                builder = builder.database_path(path);
            }
            if self.in_memory {
                builder = builder.in_memory();
            }
            let store = builder.build()?;
            Ok(AsyncDeckStore {
                inner: Arc::new(Mutex::new(store)),
            })
        })
        .await
        .map_err(|e| DeckError::Internal(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncDeckStore
// ---------------------------------------------------------------------------

/// Async wrapper around [`DeckStore`].
///
/// The store sits behind a [`Mutex`], so operations run one at a time; each
/// unit of work still commits or rolls back on its own.
#[derive(Clone)]
pub struct AsyncDeckStore {
    inner: Arc<Mutex<DeckStore>>,
}

impl AsyncDeckStore {
    /// Create a new builder for configuring the async store.
    pub fn builder() -> AsyncDeckStoreBuilder {
        AsyncDeckStoreBuilder::default()
    }

    /// Run a sync store operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&DeckStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            // A panicked operation's unit of work rolled back while unwinding
            let guard = store.lock().unwrap_or_else(|poisoned| {
                eprintln!("Recovering deck store after a panicked operation");
                poisoned.into_inner()
            });
            f(&guard)
        })
        .await
        .map_err(|e| DeckError::Internal(format!("Task join error: {e}")))?
    }

    pub async fn create(&self, draft: DeckDraft) -> Result<Deck> {
        self.run(move |s| s.service().create(&draft)).await
    }

    pub async fn update(&self, id: i64, draft: DeckDraft) -> Result<Deck> {
        self.run(move |s| s.service().update(id, &draft)).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.run(move |s| s.service().delete(id)).await
    }

    pub async fn get(&self, id: i64) -> Result<Deck> {
        self.run(move |s| s.service().get(id)).await
    }

    pub async fn list(&self) -> Result<Vec<Deck>> {
        self.run(|s| s.service().list()).await
    }

    pub async fn validate(&self, draft: DeckDraft) -> Result<ValidationReport> {
        self.run(move |s| s.service().validate(&draft)).await
    }
}
