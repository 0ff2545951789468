//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. Stored 0-based, displayed and reported
//! 1-based (`Player 1` is `PlayerId(0)`).
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access, indexable by
//! `PlayerId`. Used for hands, elimination flags, and statistics columns.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::{Result, WarError};

/// Player identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)` and is
/// shown as `Player 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a player ID from a 0-based index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Create a player ID from a 1-based player number.
    ///
    /// ```
    /// use war_sim::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::from_number(1).unwrap(), PlayerId::new(0));
    /// assert!(PlayerId::from_number(0).is_err());
    /// ```
    pub fn from_number(number: usize) -> Result<Self> {
        number
            .checked_sub(1)
            .and_then(|index| u32::try_from(index).ok())
            .map(Self)
            .ok_or(WarError::InvalidPlayer { number })
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the player number (1-based).
    #[must_use]
    pub const fn number(self) -> usize {
        self.0 as usize + 1
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use war_sim::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(0));
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(|i| PlayerId(i as u32))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `Vec<T>` with one entry per player.
///
/// ## Example
///
/// ```
/// use war_sim::core::{PlayerId, PlayerMap};
///
/// let mut active: PlayerMap<bool> = PlayerMap::with_value(4, true);
/// active[PlayerId::new(1)] = false;
///
/// assert_eq!(active.iter().filter(|(_, &a)| a).count(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");

        let data = PlayerId::all(player_count).map(factory).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data, or `None` if the player is
    /// outside this map.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs in player order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u32), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in player order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u32), v))
    }

    /// Iterate over values in player order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Transform every entry, keeping player order.
    pub fn map<U>(self, mut f: impl FnMut(PlayerId, T) -> U) -> PlayerMap<U> {
        let data = self
            .data
            .into_iter()
            .enumerate()
            .map(|(i, v)| f(PlayerId(i as u32), v))
            .collect();
        PlayerMap { data }
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.data.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
