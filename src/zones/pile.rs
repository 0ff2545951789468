//! Ordered card piles.
//!
//! A `Pile` is an explicit stack: index 0 is the bottom, the last element
//! is the top. Draws pop from the top and captured cards are pushed on
//! top in the order they are won.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::GameRng;

/// Ordered sequence of cards, back = top.
///
/// ```
/// use war_sim::cards::CardId;
/// use war_sim::zones::Pile;
///
/// let mut pile = Pile::new();
/// pile.push(CardId::new(1));
/// pile.push(CardId::new(2));
///
/// assert_eq!(pile.pop(), Some(CardId::new(2)));
/// assert_eq!(pile.take_bottom(), Some(CardId::new(1)));
/// assert!(pile.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vec<CardId>,
}

impl Pile {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cards in the pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the pile is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Put a card on top.
    pub fn push(&mut self, card: CardId) {
        self.cards.push(card);
    }

    /// Remove and return the top card.
    pub fn pop(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Remove and return the bottom card (the earliest inserted).
    pub fn take_bottom(&mut self) -> Option<CardId> {
        if self.cards.is_empty() {
            return None;
        }
        Some(self.cards.remove(0))
    }

    /// Remove a specific card. Returns `false` if it was not in the pile.
    pub fn remove(&mut self, card: CardId) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Check if the pile holds a card.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    /// Cards from bottom to top.
    #[must_use]
    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }

    /// Iterate from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    /// Shuffle the pile in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    /// Take every card, leaving the pile empty.
    pub fn take(&mut self) -> Pile {
        std::mem::take(self)
    }
}

impl Extend<CardId> for Pile {
    fn extend<I: IntoIterator<Item = CardId>>(&mut self, iter: I) {
        self.cards.extend(iter);
    }
}

impl FromIterator<CardId> for Pile {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<CardId>> for Pile {
    fn from(cards: Vec<CardId>) -> Self {
        Self { cards }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CardId> {
        raw.iter().copied().map(CardId::new).collect()
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let mut pile: Pile = ids(&[1, 2, 3]).into_iter().collect();

        assert_eq!(pile.pop(), Some(CardId::new(3)));
        pile.push(CardId::new(9));
        assert_eq!(pile.pop(), Some(CardId::new(9)));
        assert_eq!(pile.len(), 2);
    }

    #[test]
    fn test_take_bottom() {
        let mut pile = Pile::from(ids(&[5, 6]));

        assert_eq!(pile.take_bottom(), Some(CardId::new(5)));
        assert_eq!(pile.take_bottom(), Some(CardId::new(6)));
        assert_eq!(pile.take_bottom(), None);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut pile = Pile::from(ids(&[1, 2, 3, 4]));

        assert!(pile.remove(CardId::new(2)));
        assert!(!pile.remove(CardId::new(2)));
        assert_eq!(pile.as_slice(), ids(&[1, 3, 4]).as_slice());
        assert!(!pile.contains(CardId::new(2)));
    }

    #[test]
    fn test_take_empties() {
        let mut pile = Pile::from(ids(&[1, 2]));
        let taken = pile.take();

        assert!(pile.is_empty());
        assert_eq!(taken.len(), 2);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut rng = GameRng::new(3);
        let mut pile: Pile = (0..30).map(CardId::new).collect();
        pile.shuffle(&mut rng);

        let mut cards = pile.as_slice().to_vec();
        cards.sort();
        assert_eq!(cards, (0..30).map(CardId::new).collect::<Vec<_>>());
    }
}
