//! Accumulates the in-progress match row and appends it to the table.

use tracing::info;

use super::record::MatchRecord;
use super::table::StatsTable;
use crate::core::{PlayerId, PlayerMap};

/// Records eliminations and winners into a `StatsTable`.
///
/// ## Usage
///
/// ```
/// use war_sim::core::PlayerId;
/// use war_sim::stats::StatsRecorder;
///
/// let mut recorder = StatsRecorder::new(3);
/// recorder.record_loss(10, PlayerId::new(0));
/// recorder.record_loss(25, PlayerId::new(2));
/// assert_eq!(recorder.record_win(25), PlayerId::new(1));
/// recorder.finalize_match();
///
/// assert_eq!(recorder.table().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct StatsRecorder {
    table: StatsTable,
    eliminated_at: PlayerMap<Option<u32>>,
    rounds: u32,
    winner: Option<PlayerId>,
}

impl StatsRecorder {
    /// Create a recorder with an empty table for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            table: StatsTable::new(player_count),
            eliminated_at: PlayerMap::with_value(player_count, None),
            rounds: 0,
            winner: None,
        }
    }

    /// Player count of the current table.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.table.player_count()
    }

    /// Reset the table if its shape does not match `player_count`.
    ///
    /// Returns `true` if a reset happened. Prior rows are discarded.
    pub fn ensure_shape(&mut self, player_count: usize) -> bool {
        if self.table.player_count() == player_count {
            return false;
        }
        info!(
            from = self.table.player_count(),
            to = player_count,
            discarded = self.table.len(),
            "player count changed; statistics reset"
        );
        *self = Self::new(player_count);
        true
    }

    /// Record that `player` was eliminated after surviving `rounds` rounds.
    pub fn record_loss(&mut self, rounds: u32, player: PlayerId) {
        match self.eliminated_at.get_mut(player) {
            Some(slot) => *slot = Some(rounds),
            None => debug_assert!(false, "{player} outside a {}-player table", self.player_count()),
        }
    }

    /// Record the match total and settle the winner.
    ///
    /// The winner is the first player with no recorded loss. If every
    /// player has a loss recorded, the one who survived longest wins.
    pub fn record_win(&mut self, total_rounds: u32) -> PlayerId {
        let winner = self
            .eliminated_at
            .iter()
            .find(|(_, round)| round.is_none())
            .map(|(player, _)| player)
            .unwrap_or_else(|| self.longest_survivor());
        self.rounds = total_rounds;
        self.winner = Some(winner);
        winner
    }

    /// Append the in-progress row under the next match number and reset
    /// the row.
    pub fn finalize_match(&mut self) -> &MatchRecord {
        let winner = match self.winner {
            Some(winner) => winner,
            None => self.record_win(self.rounds),
        };
        let player_count = self.player_count();
        let mut eliminated_at =
            std::mem::replace(&mut self.eliminated_at, PlayerMap::with_value(player_count, None));
        eliminated_at[winner] = None;

        let record = MatchRecord {
            match_number: self.table.next_match_number(),
            rounds: self.rounds,
            winner,
            eliminated_at,
        };
        self.rounds = 0;
        self.winner = None;
        self.table.push(record);

        // The push above guarantees a last row.
        match self.table.last() {
            Some(record) => record,
            None => unreachable!("table is non-empty after push"),
        }
    }

    /// Discard the in-progress row without recording it.
    pub fn discard_pending(&mut self) {
        let player_count = self.player_count();
        self.eliminated_at = PlayerMap::with_value(player_count, None);
        self.rounds = 0;
        self.winner = None;
    }

    /// The recorded table.
    #[must_use]
    pub fn table(&self) -> &StatsTable {
        &self.table
    }

    /// O(1) snapshot of the table.
    #[must_use]
    pub fn snapshot(&self) -> StatsTable {
        self.table.clone()
    }

    /// Remove every recorded match, keeping the current shape.
    ///
    /// The in-progress row survives, so a game being played records its
    /// earlier eliminations when it ends.
    pub fn clear(&mut self) {
        self.table = StatsTable::new(self.player_count());
    }

    fn longest_survivor(&self) -> PlayerId {
        self.eliminated_at
            .iter()
            .fold((PlayerId::new(0), 0), |best, (player, round)| {
                let round = round.unwrap_or(0);
                if round > best.1 {
                    (player, round)
                } else {
                    best
                }
            })
            .0
    }
}
