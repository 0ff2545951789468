//! Playable games built on the engine.
//!
//! - `war`: the War card game, N players, configurable rule variants

pub mod war;
