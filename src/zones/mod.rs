//! Card piles and per-player hands.
//!
//! Piles are explicit stacks (back = top), so draw order is a testable
//! contract rather than a side effect of a container type.

mod hand;
mod pile;

pub use hand::PlayerHand;
pub use pile::Pile;
