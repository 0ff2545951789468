//! Cards and the deck they are dealt from.
//!
//! - `Card`: identity plus strength, immutable once built
//! - `Deck`: every card exactly once, with name lookup
//! - `DeckBuilder`: ranks × suits + unsuited cards

mod card;
mod deck;

pub use card::{Card, CardId};
pub use deck::{Deck, DeckBuilder, SUIT_SEPARATOR};
