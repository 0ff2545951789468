//! Splitting a shuffled deck into per-player hands.
//!
//! ## Algorithm
//!
//! 1. Shuffle the whole deck into a pool.
//! 2. Pre-split cheats: pull each cheated card from the pool straight into
//!    its player's hand.
//! 3. Even share `n = (|deck| - v) / (N - c)`, where `v` and `c` are the
//!    total and count of hand-size overrides for players numbered below
//!    `N`.
//! 4. Top every player up to their override (or `n`) from the front of
//!    the pool, then shuffle that hand. Whatever is left in the pool is
//!    dropped from the game.
//! 5. Post-split cheats: move each cheated card to its player, push any
//!    excess off the bottom of over-full hands into an overflow pool, and
//!    backfill short hands from that pool.
//!
//! Pre-split cheats never count against the even share, so a player with
//! many of them ends up with more than `n` cards.

use std::collections::VecDeque;

use tracing::debug;

use crate::cards::{CardId, Deck};
use crate::core::{CheatTiming, GameRng, PlayerId, PlayerMap, Result, RulesConfig, WarError};
use crate::zones::{Pile, PlayerHand};

/// Fewest players a split can seat.
pub const MIN_PLAYERS: usize = 2;

/// The result of a split.
#[derive(Clone, Debug)]
pub struct Deal {
    /// Starting hands, won piles empty.
    pub hands: PlayerMap<PlayerHand>,
    /// Cards left over after every hand was filled. Out of play.
    pub dropped: Vec<CardId>,
}

/// Check that `player_count` can be dealt from `deck`: at least two
/// players, and no more players than cards.
pub fn check_player_count(deck: &Deck, player_count: usize) -> Result<()> {
    let max = deck.len();
    if player_count < MIN_PLAYERS || player_count > max {
        return Err(WarError::InvalidPlayerCount {
            requested: player_count,
            max,
        });
    }
    Ok(())
}

/// Resolve cheat names to cards and check every target is seated.
fn resolve_cheats(
    deck: &Deck,
    config: &RulesConfig,
    player_count: usize,
) -> Result<Vec<(CardId, PlayerId)>> {
    config
        .cheats()
        .iter()
        .map(|(name, &player)| {
            let card = deck
                .id_of(name)
                .ok_or_else(|| WarError::UnknownCard { name: name.clone() })?;
            if player.index() >= player_count {
                return Err(WarError::CheatPlayerOutOfRange {
                    card: name.clone(),
                    player,
                    player_count,
                });
            }
            Ok((card, player))
        })
        .collect()
}

/// Cards each player without a counted override receives.
///
/// Overrides are only counted for players numbered below `player_count`;
/// the last seat's override is still honoured when dealing but does not
/// shrink everyone else's share.
#[must_use]
pub fn even_share(deck_len: usize, config: &RulesConfig, player_count: usize) -> usize {
    let (fixed_total, fixed_count) = config
        .hand_sizes()
        .iter()
        .filter(|(player, _)| player.number() < player_count)
        .fold((0usize, 0usize), |(total, count), (_, &size)| (total + size, count + 1));

    if player_count > fixed_count {
        deck_len.saturating_sub(fixed_total) / (player_count - fixed_count)
    } else {
        0
    }
}

/// Split `deck` between `player_count` players.
///
/// Fails without consuming randomness if the player count or any cheat
/// is invalid.
pub fn deal(
    deck: &Deck,
    config: &RulesConfig,
    player_count: usize,
    rng: &mut GameRng,
) -> Result<Deal> {
    check_player_count(deck, player_count)?;
    let cheats = resolve_cheats(deck, config, player_count)?;

    let mut pool: Vec<CardId> = deck.ids().collect();
    rng.shuffle(&mut pool);

    let mut hands: PlayerMap<Pile> = PlayerMap::with_default(player_count);

    if config.cheat_timing == CheatTiming::PreSplit && !cheats.is_empty() {
        let mut cheated = vec![false; deck.len()];
        for &(card, player) in &cheats {
            cheated[card.index()] = true;
            hands[player].push(card);
        }
        pool.retain(|card| !cheated[card.index()]);
        debug!(count = cheats.len(), "cheats applied before split");
    }

    let share = even_share(deck.len(), config, player_count);
    let mut pool = pool.into_iter();
    for (player, hand) in hands.iter_mut() {
        let target = config.hand_size(player).unwrap_or(share);
        let needed = target.saturating_sub(hand.len());
        hand.extend(pool.by_ref().take(needed));
        hand.shuffle(rng);
    }
    let mut dropped: Vec<CardId> = pool.collect();

    if config.cheat_timing == CheatTiming::PostSplit && !cheats.is_empty() {
        let leftover = rehome_cheats(&mut hands, &cheats, rng);
        dropped.extend(leftover);
        debug!(count = cheats.len(), "cheats applied after split");
    }

    debug!(
        players = player_count,
        share,
        sizes = ?hands.values().map(Pile::len).collect::<Vec<_>>(),
        dropped = dropped.len(),
        "deck split"
    );

    let hands = hands.map(|_, pile| PlayerHand::dealt(pile));
    Ok(Deal { hands, dropped })
}

/// Move cheated cards to their target hands, keeping each hand at its
/// pre-cheat size where the overflow allows.
///
/// Order is fixed: cheats in card-name order, excess taken from the
/// bottom of each over-full hand in player order, backfill drawn from the
/// front of the overflow in player order. Returns any overflow that could
/// not be placed.
fn rehome_cheats(
    hands: &mut PlayerMap<Pile>,
    cheats: &[(CardId, PlayerId)],
    rng: &mut GameRng,
) -> Vec<CardId> {
    let player_count = hands.player_count();
    let before: PlayerMap<usize> = PlayerMap::new(player_count, |player| hands[player].len());
    let mut held: PlayerMap<Vec<CardId>> = PlayerMap::with_default(player_count);
    let mut touched = PlayerMap::with_value(player_count, false);

    for &(card, target) in cheats {
        // Cards dropped by the split are not in any hand and stay dropped.
        if let Some((owner, hand)) = hands.iter_mut().find(|(_, hand)| hand.contains(card)) {
            hand.remove(card);
            held[target].push(card);
            touched[owner] = true;
            touched[target] = true;
        }
    }

    let mut overflow = VecDeque::new();
    for (player, hand) in hands.iter_mut() {
        let excess = (hand.len() + held[player].len()).saturating_sub(before[player]);
        for _ in 0..excess {
            match hand.take_bottom() {
                Some(card) => {
                    overflow.push_back(card);
                    touched[player] = true;
                }
                None => break,
            }
        }
    }

    for (player, hand) in hands.iter_mut() {
        let short = before[player].saturating_sub(hand.len() + held[player].len());
        hand.extend(held[player].drain(..));
        for _ in 0..short {
            match overflow.pop_front() {
                Some(card) => {
                    hand.push(card);
                    touched[player] = true;
                }
                None => break,
            }
        }
        if touched[player] {
            hand.shuffle(rng);
        }
    }

    debug_assert!(overflow.is_empty(), "overflow never exceeds total shortfall");
    overflow.into_iter().collect()
}
