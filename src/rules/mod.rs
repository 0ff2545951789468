//! Rules of War.
//!
//! - `deal`: splitting the deck between players, cheats included
//! - `battle`: round-by-round play, wars, eliminations

pub mod battle;
pub mod deal;

pub use battle::{Battle, BattleContext, RoundOutcome};
pub use deal::{check_player_count, deal, even_share, Deal, MIN_PLAYERS};
