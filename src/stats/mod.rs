//! Per-match statistics.
//!
//! - `MatchRecord`: one row per completed match
//! - `StatsTable`: append-only table with O(1) snapshots
//! - `StatsRecorder`: builds the in-progress row as players are eliminated

mod record;
mod recorder;
mod table;

pub use record::MatchRecord;
pub use recorder::StatsRecorder;
pub use table::{StatsTable, Tally};
