//! Rule variants for a War simulation.
//!
//! `RulesConfig` is the long-lived configuration store. It survives any
//! number of matches and is consulted at every split and every won-pile
//! promotion:
//! - cheats: card identity → player that must be dealt it
//! - hand sizes: player → fixed starting hand size
//! - reshuffle-on-win and cheat-timing policy flags
//! - the RNG seed for reproducible batches

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Result, WarError};
use super::player::PlayerId;
use crate::cards::Deck;

/// When cheated cards are handed to their target player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheatTiming {
    /// Cheated cards are removed from the pool before the even split.
    /// They are guaranteed to their player and do not count against
    /// the split.
    #[default]
    PreSplit,
    /// Cheated cards are re-homed after the split, preserving hand sizes
    /// where the overflow allows. Cards dropped by an uneven split stay
    /// dropped.
    PostSplit,
}

/// Rule variants and forced assignments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Shuffle a won pile before it becomes the active deck.
    /// Without it, games run much longer.
    pub reshuffle_wins: bool,

    /// When cheats are applied relative to the split.
    pub cheat_timing: CheatTiming,

    /// Seed for the game's RNG.
    pub seed: u64,

    /// Card identity → target player. Iterated in card-name order.
    cheats: BTreeMap<String, PlayerId>,

    /// Player → fixed starting hand size.
    hand_sizes: BTreeMap<PlayerId, usize>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            reshuffle_wins: true,
            cheat_timing: CheatTiming::PreSplit,
            seed: 42,
            cheats: BTreeMap::new(),
            hand_sizes: BTreeMap::new(),
        }
    }
}

impl RulesConfig {
    /// Create a config with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether won piles are reshuffled.
    #[must_use]
    pub fn with_reshuffle_wins(mut self, reshuffle: bool) -> Self {
        self.reshuffle_wins = reshuffle;
        self
    }

    /// Set cheat timing.
    #[must_use]
    pub fn with_cheat_timing(mut self, timing: CheatTiming) -> Self {
        self.cheat_timing = timing;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set a fixed starting hand size for a player.
    #[must_use]
    pub fn with_hand_size(mut self, player: PlayerId, size: usize) -> Self {
        self.set_hand_size(player, size);
        self
    }

    /// Assign cards to a player, validated against `deck`.
    ///
    /// Either every card is assigned or none is. A card already assigned
    /// to another player is reassigned (last write wins).
    pub fn add_cheats<S: AsRef<str>>(
        &mut self,
        deck: &Deck,
        cards: &[S],
        player: PlayerId,
    ) -> Result<()> {
        check_cards(deck, cards)?;
        for card in cards {
            self.cheats.insert(card.as_ref().to_string(), player);
        }
        debug!(count = cards.len(), %player, "cheats assigned");
        Ok(())
    }

    /// Replace all cheats with the given assignment.
    ///
    /// Existing cheats are kept if any card is unknown.
    pub fn set_cheats<S: AsRef<str>>(
        &mut self,
        deck: &Deck,
        cards: &[S],
        player: PlayerId,
    ) -> Result<()> {
        check_cards(deck, cards)?;
        self.cheats.clear();
        self.add_cheats(deck, cards, player)
    }

    /// Remove all cheats.
    pub fn clear_cheats(&mut self) {
        self.cheats.clear();
    }

    /// Current cheat assignments in card-name order.
    #[must_use]
    pub fn cheats(&self) -> &BTreeMap<String, PlayerId> {
        &self.cheats
    }

    /// Set a fixed starting hand size for a player.
    ///
    /// If the player also has more pre-split cheats than `size`, they keep
    /// every cheated card.
    pub fn set_hand_size(&mut self, player: PlayerId, size: usize) {
        self.hand_sizes.insert(player, size);
    }

    /// Remove all hand-size overrides.
    pub fn clear_hand_sizes(&mut self) {
        self.hand_sizes.clear();
    }

    /// Current hand-size overrides.
    #[must_use]
    pub fn hand_sizes(&self) -> &BTreeMap<PlayerId, usize> {
        &self.hand_sizes
    }

    /// Hand-size override for one player, if any.
    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> Option<usize> {
        self.hand_sizes.get(&player).copied()
    }
}

fn check_cards<S: AsRef<str>>(deck: &Deck, cards: &[S]) -> Result<()> {
    match cards.iter().find(|c| !deck.contains(c.as_ref())) {
        Some(unknown) => Err(WarError::UnknownCard {
            name: unknown.as_ref().to_string(),
        }),
        None => Ok(()),
    }
}
