//! Storage-facing query modules.
//!
//! Each module provides a struct that borrows from a
//! [`Connection`](crate::connection::Connection) and returns `Result<T>`
//! with domain models.

pub mod catalog;
pub mod decks;

pub use catalog::CardCatalog;
pub use decks::DeckRepository;
