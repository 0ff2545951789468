//! Core types: players, errors, RNG, and rule configuration.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{CheatTiming, RulesConfig};
pub use error::{Result, WarError};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
