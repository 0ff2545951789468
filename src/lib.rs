//! # war-sim
//!
//! A simulation engine for the card game War, built for running large
//! batches of matches and collecting per-match statistics.
//!
//! ## Design Principles
//!
//! 1. **N-Player First**: Every API takes `player_count` as context.
//!    No convenience methods that assume 2 players.
//!
//! 2. **Configuration Over Convention**: Decks, cheated cards, fixed hand
//!    sizes and reshuffle policy are all configured per engine instance.
//!
//! 3. **Reproducible**: All randomness flows through one seeded `GameRng`,
//!    so a seed fully determines every match.
//!
//! ## Architecture
//!
//! - **Explicit stacks**: piles are ordered sequences with the top at the
//!   back, and war chains resolve on an explicit stack of pots rather than
//!   by recursion.
//!
//! - **Persistent Data Structures**: the statistics table is an `im`
//!   vector, so snapshots handed to callers are O(1) clones.
//!
//! ## Modules
//!
//! - `core`: Players, errors, RNG, rule configuration
//! - `cards`: Cards and deck construction
//! - `zones`: Piles and per-player hands
//! - `rules`: Deck split and battle resolution
//! - `stats`: Match records and the statistics table
//! - `games`: The `WarGame` facade

pub mod cards;
pub mod core;
pub mod games;
pub mod rules;
pub mod stats;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    CheatTiming, GameRng, GameRngState, PlayerId, PlayerMap, Result, RulesConfig, WarError,
};

pub use crate::cards::{Card, CardId, Deck, DeckBuilder};

pub use crate::zones::{PlayerHand, Pile};

pub use crate::rules::{Battle, Deal, RoundOutcome};

pub use crate::stats::{MatchRecord, StatsRecorder, StatsTable, Tally};

pub use crate::games::war::{WarGame, WarGameBuilder};
