//! Per-player hand state for one game.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pile::Pile;
use crate::cards::CardId;
use crate::core::{GameRng, PlayerId};

/// A player's cards during a game: the active deck they draw from and the
/// won pile of captured cards.
///
/// A player is still in the game while either pile holds cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    /// Draw pile.
    pub active: Pile,
    /// Captured cards, not yet back in play.
    pub won: Pile,
}

impl PlayerHand {
    /// Create a hand from a dealt active deck.
    #[must_use]
    pub fn dealt(active: Pile) -> Self {
        Self {
            active,
            won: Pile::new(),
        }
    }

    /// Total cards held across both piles.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.active.len() + self.won.len()
    }

    /// True when both piles are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.won.is_empty()
    }

    /// Draw the top card of the active deck.
    ///
    /// When the active deck is exhausted the won pile becomes the active
    /// deck, reshuffled if `reshuffle` is set, otherwise in the order the
    /// cards were won. Returns `None` only if both piles are empty.
    pub fn draw(&mut self, player: PlayerId, reshuffle: bool, rng: &mut GameRng) -> Option<CardId> {
        if self.active.is_empty() && !self.won.is_empty() {
            self.active = self.won.take();
            if reshuffle {
                self.active.shuffle(rng);
            }
            debug!(%player, cards = self.active.len(), reshuffle, "won pile promoted");
        }
        self.active.pop()
    }

    /// Add captured cards to the won pile, in order.
    pub fn capture(&mut self, cards: impl IntoIterator<Item = CardId>) {
        self.won.extend(cards);
    }

    /// Iterate over every card held, active deck first.
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.active.iter().chain(self.won.iter())
    }
}
