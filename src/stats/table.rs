//! Append-only table of match records.
//!
//! Backed by an `im::Vector`, so `clone()` is O(1) and a snapshot handed
//! to an exporter never observes later appends.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::record::MatchRecord;
use crate::core::{PlayerId, PlayerMap};

/// Matches played and the share won by the most successful player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Total matches in the table.
    pub matches: usize,
    /// Player with the most wins (lowest number on ties).
    pub leader: PlayerId,
    /// Wins by `leader`.
    pub wins: usize,
    /// `wins / matches` as a percentage.
    pub win_percentage: f64,
}

/// Statistics for a fixed player count.
///
/// The column shape is fixed for the table's lifetime; a different
/// player count needs a new table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsTable {
    player_count: usize,
    rows: Vector<MatchRecord>,
}

impl StatsTable {
    /// Create an empty table for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        Self {
            player_count,
            rows: Vector::new(),
        }
    }

    /// Player count the columns were built for.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Number of matches recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no match has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over records in match order.
    pub fn iter(&self) -> impl Iterator<Item = &MatchRecord> {
        self.rows.iter()
    }

    /// Get a record by its 1-based match number.
    #[must_use]
    pub fn get(&self, match_number: u32) -> Option<&MatchRecord> {
        let idx = (match_number as usize).checked_sub(1)?;
        self.rows.get(idx)
    }

    /// The most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&MatchRecord> {
        self.rows.last()
    }

    /// Number the next appended record will get.
    #[must_use]
    pub fn next_match_number(&self) -> u32 {
        self.rows.len() as u32 + 1
    }

    /// Wins per player.
    #[must_use]
    pub fn win_counts(&self) -> PlayerMap<usize> {
        let mut counts = PlayerMap::with_value(self.player_count, 0);
        for record in &self.rows {
            if let Some(count) = counts.get_mut(record.winner) {
                *count += 1;
            }
        }
        counts
    }

    /// Matches played and the leading player's win percentage.
    ///
    /// Returns `None` for an empty table.
    #[must_use]
    pub fn tally(&self) -> Option<Tally> {
        if self.rows.is_empty() {
            return None;
        }
        let counts = self.win_counts();
        let (leader, wins) = counts.iter().fold(None, |best, (player, &wins)| match best {
            Some((_, best_wins)) if best_wins >= wins => best,
            _ => Some((player, wins)),
        })?;
        let matches = self.rows.len();
        Some(Tally {
            matches,
            leader,
            wins,
            win_percentage: wins as f64 / matches as f64 * 100.0,
        })
    }

    pub(crate) fn push(&mut self, record: MatchRecord) {
        debug_assert_eq!(record.player_count(), self.player_count);
        self.rows.push_back(record);
    }
}
