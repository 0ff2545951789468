//! Card identity and strength.
//!
//! A `Card` is immutable once its deck is built. Hands and piles hold
//! `CardId`s, which index into the owning `Deck`.

use serde::{Deserialize, Serialize};

/// Index of a card within its deck.
///
/// Only meaningful together with the `Deck` that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A single card: its identity (`"A-Heart"`, `"Joker"`) and strength.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Position in the deck.
    pub id: CardId,

    /// Card identity: rank and suit joined by `-`, or an unsuited name.
    pub name: String,

    /// Strength compared when cards meet in battle.
    pub strength: i64,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, strength: i64) -> Self {
        Self {
            id,
            name: name.into(),
            strength,
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.strength)
    }
}
