//! One row of the statistics table.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// Outcome of one completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Sequential match number, starting at 1.
    pub match_number: u32,

    /// Total rounds played, war sub-rounds included.
    pub rounds: u32,

    /// The player left standing.
    pub winner: PlayerId,

    /// Round at which each player was eliminated. `None` for the winner.
    pub eliminated_at: PlayerMap<Option<u32>>,
}

impl MatchRecord {
    /// Number of players in the match.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.eliminated_at.player_count()
    }

    /// Rounds a player survived. The winner survived the whole match.
    #[must_use]
    pub fn rounds_survived(&self, player: PlayerId) -> u32 {
        match self.eliminated_at.get(player) {
            Some(Some(round)) => *round,
            _ => self.rounds,
        }
    }

    /// Players eliminated during the match, in player order.
    pub fn losers(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.eliminated_at
            .iter()
            .filter(|(_, round)| round.is_some())
            .map(|(player, _)| player)
    }
}
