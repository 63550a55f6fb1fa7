pub mod card;
pub mod deck;
pub mod request;

pub use card::*;
pub use deck::*;
pub use request::*;
