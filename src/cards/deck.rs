//! Deck construction and lookup.
//!
//! The `Deck` stores every card exactly once and provides lookup by
//! `CardId` and by name. It is never mutated after `DeckBuilder::build`;
//! hands and piles are derived copies of its ids.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use crate::core::{Result, WarError};

/// Separator between rank and suit in a suited card's identity.
pub const SUIT_SEPARATOR: &str = "-";

/// Ranks of the standard deck with their strengths.
const STANDARD_RANKS: [(&str, i64); 13] = [
    ("A", 14),
    ("K", 13),
    ("Q", 12),
    ("J", 11),
    ("10", 10),
    ("9", 9),
    ("8", 8),
    ("7", 7),
    ("6", 6),
    ("5", 5),
    ("4", 4),
    ("3", 3),
    ("2", 2),
];

/// Suits of the standard deck.
const STANDARD_SUITS: [&str; 4] = ["Heart", "Club", "Diamond", "Spade"];

/// The full card pool for a game.
///
/// ## Example
///
/// ```
/// use war_sim::cards::Deck;
///
/// let deck = Deck::standard();
/// assert_eq!(deck.len(), 52);
/// assert_eq!(deck.by_name("A-Spade").map(|c| c.strength), Some(14));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<Card>", into = "Vec<Card>")]
pub struct Deck {
    cards: Vec<Card>,
    by_name: FxHashMap<String, CardId>,
}

impl Deck {
    /// The standard 52-card deck: ranks 2-10, J=11, Q=12, K=13, A=14
    /// across Heart, Club, Diamond, Spade.
    #[must_use]
    pub fn standard() -> Self {
        let mut builder = DeckBuilder::new();
        for (rank, strength) in STANDARD_RANKS {
            builder = builder.rank(rank, strength);
        }
        for suit in STANDARD_SUITS {
            builder = builder.suit(suit);
        }
        builder.assemble()
    }

    /// Get a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Look up a card by its identity.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Card> {
        let id = self.id_of(name)?;
        self.get(id)
    }

    /// Resolve a card identity to its id.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<CardId> {
        self.by_name.get(name).copied()
    }

    /// Check whether a card identity is part of this deck.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.id_of(name).is_some()
    }

    /// Strength of a card. Unknown ids have strength 0.
    #[must_use]
    pub fn strength(&self, id: CardId) -> i64 {
        self.get(id).map_or(0, |c| c.strength)
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards in build order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// All card ids in build order.
    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|c| c.id)
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        let mut deck = Deck {
            cards: Vec::with_capacity(cards.len()),
            by_name: FxHashMap::default(),
        };
        for card in cards {
            insert(&mut deck, card.name, card.strength);
        }
        deck
    }
}

impl From<Deck> for Vec<Card> {
    fn from(deck: Deck) -> Self {
        deck.cards
    }
}

/// Builder for a `Deck`: ranks crossed with suits, plus unsuited cards.
///
/// Suited identities are `"<rank>-<suit>"`. Unsuited cards are applied
/// last, so an unsuited card whose name collides with a suited identity
/// overwrites that card's strength.
///
/// ```
/// use war_sim::cards::DeckBuilder;
///
/// let deck = DeckBuilder::new()
///     .rank("A", 14)
///     .rank("K", 13)
///     .suit("Heart")
///     .suit("Spade")
///     .unsuited("Joker", 15)
///     .build()
///     .unwrap();
///
/// assert_eq!(deck.len(), 5);
/// assert!(deck.contains("K-Spade"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DeckBuilder {
    ranks: Vec<(String, i64)>,
    suits: Vec<String>,
    unsuited: Vec<(String, i64)>,
}

impl DeckBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rank and its strength. A repeated rank keeps the last strength.
    #[must_use]
    pub fn rank(mut self, rank: impl Into<String>, strength: i64) -> Self {
        self.ranks.push((rank.into(), strength));
        self
    }

    /// Add a suit label.
    #[must_use]
    pub fn suit(mut self, suit: impl Into<String>) -> Self {
        self.suits.push(suit.into());
        self
    }

    /// Add an unsuited card.
    #[must_use]
    pub fn unsuited(mut self, name: impl Into<String>, strength: i64) -> Self {
        self.unsuited.push((name.into(), strength));
        self
    }

    /// Build the deck. Fails if no cards result.
    pub fn build(self) -> Result<Deck> {
        let deck = self.assemble();
        if deck.is_empty() {
            return Err(WarError::EmptyDeck);
        }
        Ok(deck)
    }

    fn assemble(self) -> Deck {
        let mut deck = Deck {
            cards: Vec::with_capacity(self.ranks.len() * self.suits.len() + self.unsuited.len()),
            by_name: FxHashMap::default(),
        };

        for suit in &self.suits {
            for (rank, strength) in &self.ranks {
                let name = [rank.as_str(), SUIT_SEPARATOR, suit.as_str()].concat();
                insert(&mut deck, name, *strength);
            }
        }
        for (name, strength) in self.unsuited {
            insert(&mut deck, name, strength);
        }

        deck
    }
}

/// Insert or overwrite a card, keeping its original position on overwrite.
fn insert(deck: &mut Deck, name: String, strength: i64) {
    if let Some(&id) = deck.by_name.get(&name) {
        deck.cards[id.index()].strength = strength;
        return;
    }
    let id = CardId::new(deck.cards.len() as u32);
    deck.by_name.insert(name.clone(), id);
    deck.cards.push(Card::new(id, name, strength));
}
