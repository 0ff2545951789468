//! Error types for deck construction, configuration, and game control.
//!
//! Every error here is a configuration error: it is raised before any
//! state is mutated, so the caller can fix the input and retry.
//! Contract violations inside the battle resolver are debug assertions,
//! not variants of this enum.

use thiserror::Error;

use super::player::PlayerId;

/// Errors raised by the War engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WarError {
    /// The deck builder produced no cards.
    #[error("deck must contain at least one card")]
    EmptyDeck,

    /// A cheat names a card that is not part of the current deck.
    #[error("card `{name}` is not in the deck")]
    UnknownCard { name: String },

    /// Player count is below 2 or above what the deck can supply.
    #[error("player count {requested} out of range (2..={max})")]
    InvalidPlayerCount { requested: usize, max: usize },

    /// A cheat targets a player that does not exist at split time.
    #[error("card `{card}` is assigned to {player}, but only {player_count} players are dealt")]
    CheatPlayerOutOfRange {
        card: String,
        player: PlayerId,
        player_count: usize,
    },

    /// Player numbers are 1-based.
    #[error("player number {number} is invalid (numbers start at 1)")]
    InvalidPlayer { number: usize },

    /// A round was requested before any deal.
    #[error("no game in progress; split the deck first")]
    NoGameInProgress,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WarError>;
