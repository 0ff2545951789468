//! The War card game.
//!
//! Every player draws one card per round and the strongest card takes the
//! pot. Ties start a war, resolved with one face-down card per player
//! before the next comparison. The last player holding cards wins.
//!
//! Supports any player count from 2 up to the deck size, cheated cards,
//! fixed hand sizes, and an optional round ceiling. Each completed match
//! appends one row to the statistics table.

mod game;

pub use game::{WarGame, WarGameBuilder};
