//! Round-by-round battle resolution.
//!
//! One call to [`Battle::play_round`] plays one round-step: every active
//! player draws one card and the strongest card takes the pot. A tie at
//! the top starts a war: one face-down card per active player, then
//! another face-up comparison, repeated until a single player leads.
//! The winner of the last comparison takes every card from the whole
//! chain.
//!
//! Each war burns exactly one face-down card, not the traditional three.
//!
//! Eliminated players draw nothing. Their empty slot never takes part in
//! the comparison, so it cannot win or tie, even against cards of zero or
//! negative strength.
//!
//! The war chain is kept on an explicit stack of pots, so depth is bounded
//! only by the cards in play, never by the native call stack.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{info, trace, warn};

use super::deal::Deal;
use crate::cards::{CardId, Deck};
use crate::core::{GameRng, PlayerId, PlayerMap};
use crate::stats::StatsRecorder;
use crate::zones::PlayerHand;

/// One card per player, `None` for players already out.
type Entries = SmallVec<[Option<CardId>; 8]>;

/// Cards committed during one sub-round of a war chain.
type Pot = SmallVec<[CardId; 8]>;

/// Shared state a battle needs for each round-step.
pub struct BattleContext<'a> {
    /// Card strengths.
    pub deck: &'a Deck,
    /// Shuffle won piles when they become the active deck.
    pub reshuffle_wins: bool,
    /// Source of every shuffle.
    pub rng: &'a mut GameRng,
    /// Eliminations and results are written here as they happen.
    pub stats: &'a mut StatsRecorder,
}

/// Result of one round-step.
///
/// Only active players can appear as a winner. Eliminated seats draw
/// nothing and are skipped when cards are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// A player took the pot.
    Won {
        /// Player who took the pot.
        winner: PlayerId,
        /// Cards captured, face-down cards included.
        captured: usize,
        /// Wars fought before the pot was decided.
        wars: u32,
    },
    /// The game has a winner. Repeated on every call after the end.
    GameOver {
        /// Last player standing.
        winner: PlayerId,
        /// Total rounds in the match.
        rounds: u32,
    },
}

impl RoundOutcome {
    /// True once the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, RoundOutcome::GameOver { .. })
    }

    /// Winner of the round, or of the game.
    #[must_use]
    pub fn winner(&self) -> PlayerId {
        match *self {
            RoundOutcome::Won { winner, .. } | RoundOutcome::GameOver { winner, .. } => winner,
        }
    }
}

/// Result of drawing one card per player.
enum Draw {
    Entries(Entries),
    GameOver(RoundOutcome),
}

/// State of one game in progress.
#[derive(Clone, Debug)]
pub struct Battle {
    hands: PlayerMap<PlayerHand>,
    active: PlayerMap<bool>,
    dropped: Vec<CardId>,
    round: u32,
    wars: u32,
    winner: Option<PlayerId>,
}

impl Battle {
    /// Start a game from a fresh deal.
    #[must_use]
    pub fn new(deal: Deal) -> Self {
        let player_count = deal.hands.player_count();
        Self {
            hands: deal.hands,
            active: PlayerMap::with_value(player_count, true),
            dropped: deal.dropped,
            round: 0,
            wars: 0,
            winner: None,
        }
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    /// Rounds played so far, or the match total once the game is over.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Wars fought so far.
    #[must_use]
    pub fn wars(&self) -> u32 {
        self.wars
    }

    /// The winner, once decided.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// True once the game has a winner.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Whether a player is still in the game.
    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.active.get(player).copied().unwrap_or(false)
    }

    /// Number of players still in the game.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.values().filter(|&&a| a).count()
    }

    /// A player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Option<&PlayerHand> {
        self.hands.get(player)
    }

    /// All hands.
    #[must_use]
    pub fn hands(&self) -> &PlayerMap<PlayerHand> {
        &self.hands
    }

    /// Cards removed from play by the split.
    #[must_use]
    pub fn dropped(&self) -> &[CardId] {
        &self.dropped
    }

    /// Play one round-step, resolving any war it starts.
    pub fn play_round(&mut self, ctx: &mut BattleContext<'_>) -> RoundOutcome {
        if let Some(winner) = self.winner {
            info!(rounds = self.round, %winner, "game over");
            return RoundOutcome::GameOver {
                winner,
                rounds: self.round,
            };
        }
        debug_assert!(self.active_count() > 1, "resolver invoked without two active players");

        let mut pots: Vec<Pot> = Vec::new();
        let mut face_down = false;
        let mut wars = 0;

        loop {
            self.round += 1;
            let entries = match self.draw_entries(ctx) {
                Draw::Entries(entries) => entries,
                Draw::GameOver(outcome) => return outcome,
            };
            pots.push(entries.iter().flatten().copied().collect());

            if face_down {
                trace!(round = self.round, ?entries, "war: face-down cards");
                face_down = false;
                continue;
            }

            let best = entries
                .iter()
                .flatten()
                .map(|&card| ctx.deck.strength(card))
                .max();
            let mut leaders = self
                .active
                .player_ids()
                .zip(entries.iter())
                .filter(|(_, card)| card.map(|c| ctx.deck.strength(c)) == best)
                .map(|(player, _)| player);

            let Some(winner) = leaders.next() else {
                unreachable!("an active player always draws or ends the game");
            };
            if leaders.next().is_none() {
                let captured = self.award(winner, pots);
                trace!(round = self.round, %winner, captured, wars, "round won");
                return RoundOutcome::Won {
                    winner,
                    captured,
                    wars,
                };
            }

            wars += 1;
            self.wars += 1;
            trace!(round = self.round, ?entries, "war");
            face_down = true;
        }
    }

    /// End the game now in favour of the player holding the most cards.
    ///
    /// Ties go to the lowest player number. Every other active player is
    /// recorded as eliminated at the current round.
    pub fn concede_to_leader(&mut self, stats: &mut StatsRecorder) -> RoundOutcome {
        if let Some(winner) = self.winner {
            return RoundOutcome::GameOver {
                winner,
                rounds: self.round,
            };
        }

        let leader = self
            .hands
            .iter()
            .filter(|(player, _)| self.active[*player])
            .fold(None, |best: Option<(PlayerId, usize)>, (player, hand)| match best {
                Some((_, most)) if most >= hand.card_count() => best,
                _ => Some((player, hand.card_count())),
            })
            .map_or(PlayerId::new(0), |(player, _)| player);

        for player in self.active.player_ids() {
            if player != leader && self.active[player] {
                self.active[player] = false;
                stats.record_loss(self.round, player);
            }
        }
        warn!(round = self.round, %leader, "round limit reached; leader declared winner");
        self.finish(leader, self.round, stats)
    }

    /// Draw one card for every player, eliminating players who are out.
    fn draw_entries(&mut self, ctx: &mut BattleContext<'_>) -> Draw {
        let mut entries = Entries::with_capacity(self.player_count());

        for player in self.active.player_ids() {
            if !self.active[player] {
                entries.push(None);
                continue;
            }
            let card = self.hands[player].draw(player, ctx.reshuffle_wins, ctx.rng);
            if card.is_none() {
                // Detected this round, so this round is not survived.
                let survived = self.round - 1;
                self.active[player] = false;
                ctx.stats.record_loss(survived, player);
                info!(round = survived, %player, "player eliminated");

                if self.active_count() == 1 {
                    let winner = self
                        .active
                        .iter()
                        .find(|(_, &a)| a)
                        .map_or(player, |(p, _)| p);
                    return Draw::GameOver(self.finish(winner, survived, ctx.stats));
                }
            }
            entries.push(card);
        }

        Draw::Entries(entries)
    }

    /// Give every pot to `winner`, innermost sub-round first.
    fn award(&mut self, winner: PlayerId, mut pots: Vec<Pot>) -> usize {
        let mut captured = 0;
        let hand = &mut self.hands[winner];
        while let Some(pot) = pots.pop() {
            captured += pot.len();
            hand.capture(pot);
        }
        captured
    }

    fn finish(&mut self, winner: PlayerId, rounds: u32, stats: &mut StatsRecorder) -> RoundOutcome {
        self.round = rounds;
        self.winner = Some(winner);

        let recorded = stats.record_win(rounds);
        debug_assert_eq!(recorded, winner, "loss columns disagree with the survivor");
        stats.finalize_match();

        info!(rounds, %winner, "game over");
        RoundOutcome::GameOver { winner, rounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::DeckBuilder;
    use crate::zones::Pile;

    /// Deck of unsuited cards named after their strength ("a9", "b9", ...).
    fn deck(cards: &[(&str, i64)]) -> Deck {
        cards
            .iter()
            .fold(DeckBuilder::new(), |b, &(name, strength)| b.unsuited(name, strength))
            .build()
            .unwrap()
    }

    /// Hands listed bottom to top.
    fn battle(deck: &Deck, hands: &[&[&str]]) -> Battle {
        let piles: Vec<Pile> = hands
            .iter()
            .map(|names| names.iter().map(|n| deck.id_of(n).unwrap()).collect())
            .collect();
        let hands = PlayerMap::new(piles.len(), |p| PlayerHand::dealt(piles[p.index()].clone()));
        Battle::new(Deal {
            hands,
            dropped: Vec::new(),
        })
    }

    fn names(deck: &Deck, pile: &Pile) -> Vec<String> {
        pile.iter()
            .map(|id| deck.get(id).unwrap().name.clone())
            .collect()
    }

    struct Harness {
        rng: GameRng,
        stats: StatsRecorder,
    }

    impl Harness {
        fn new(player_count: usize) -> Self {
            Self {
                rng: GameRng::new(1),
                stats: StatsRecorder::new(player_count),
            }
        }

        fn play(&mut self, deck: &Deck, battle: &mut Battle, reshuffle: bool) -> RoundOutcome {
            let mut ctx = BattleContext {
                deck,
                reshuffle_wins: reshuffle,
                rng: &mut self.rng,
                stats: &mut self.stats,
            };
            battle.play_round(&mut ctx)
        }
    }

    #[test]
    fn test_highest_card_takes_pot() {
        let deck = deck(&[("a10", 10), ("a2", 2), ("b5", 5), ("b3", 3)]);
        let mut battle = battle(&deck, &[&["a2", "a10"], &["b3", "b5"]]);
        let mut h = Harness::new(2);

        let outcome = h.play(&deck, &mut battle, true);

        assert_eq!(
            outcome,
            RoundOutcome::Won {
                winner: PlayerId::new(0),
                captured: 2,
                wars: 0
            }
        );
        assert_eq!(battle.round(), 1);
        assert_eq!(names(&deck, &battle.hands[PlayerId::new(0)].won), vec!["a10", "b5"]);
    }

    #[test]
    fn test_war_burns_one_card_and_awards_chain() {
        let deck = deck(&[
            ("a9", 9),
            ("b9", 9),
            ("a2", 2),
            ("b3", 3),
            ("aK", 13),
            ("b4", 4),
        ]);
        let mut battle = battle(&deck, &[&["aK", "a2", "a9"], &["b4", "b3", "b9"]]);
        let mut h = Harness::new(2);

        let outcome = h.play(&deck, &mut battle, true);

        assert_eq!(
            outcome,
            RoundOutcome::Won {
                winner: PlayerId::new(0),
                captured: 6,
                wars: 1
            }
        );
        // Tie, face-down, face-up: three rounds.
        assert_eq!(battle.round(), 3);
        assert_eq!(battle.wars(), 1);
        assert_eq!(
            names(&deck, &battle.hands[PlayerId::new(0)].won),
            vec!["aK", "b4", "a2", "b3", "a9", "b9"]
        );
    }

    #[test]
    fn test_elimination_ends_two_player_game() {
        let deck = deck(&[("a9", 9), ("b2", 2)]);
        let mut battle = battle(&deck, &[&["a9"], &["b2"]]);
        let mut h = Harness::new(2);

        assert!(!h.play(&deck, &mut battle, true).is_game_over());

        let outcome = h.play(&deck, &mut battle, true);
        assert_eq!(
            outcome,
            RoundOutcome::GameOver {
                winner: PlayerId::new(0),
                rounds: 1
            }
        );
        assert_eq!(battle.round(), 1);
        assert!(!battle.is_active(PlayerId::new(1)));

        let record = h.stats.table().last().unwrap();
        assert_eq!(record.rounds, 1);
        assert_eq!(record.winner, PlayerId::new(0));
        assert_eq!(record.eliminated_at[PlayerId::new(1)], Some(1));
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let deck = deck(&[("a9", 9), ("b2", 2)]);
        let mut battle = battle(&deck, &[&["a9"], &["b2"]]);
        let mut h = Harness::new(2);

        h.play(&deck, &mut battle, true);
        let first = h.play(&deck, &mut battle, true);
        let again = h.play(&deck, &mut battle, true);

        assert_eq!(first, again);
        assert_eq!(battle.round(), 1);
        assert_eq!(h.stats.table().len(), 1);
    }

    #[test]
    fn test_game_ending_mid_war_goes_to_survivor() {
        let deck = deck(&[("a9", 9), ("b9", 9), ("b2", 2)]);
        let mut battle = battle(&deck, &[&["a9"], &["b2", "b9"]]);
        let mut h = Harness::new(2);

        // Tie, then player 1 has no face-down card.
        let outcome = h.play(&deck, &mut battle, true);

        assert_eq!(
            outcome,
            RoundOutcome::GameOver {
                winner: PlayerId::new(1),
                rounds: 1
            }
        );
        assert_eq!(h.stats.table().len(), 1);
    }

    #[test]
    fn test_eliminated_players_never_win() {
        let deck = deck(&[("a", -1), ("b", -2), ("c", -3)]);
        let mut battle = battle(&deck, &[&["a"], &["b", "c"], &[]]);
        let mut h = Harness::new(3);

        let outcome = h.play(&deck, &mut battle, true);

        // Player 3 is out before drawing; their empty slot does not
        // outrank a negative-strength card.
        assert_eq!(outcome.winner(), PlayerId::new(0));
        assert!(!battle.is_active(PlayerId::new(2)));
        assert_eq!(battle.active_count(), 2);
    }

    #[test]
    fn test_round_zero_elimination_is_recorded() {
        let deck = deck(&[("a", 5), ("b", 4), ("c", 3), ("d", 2)]);
        let mut battle = battle(&deck, &[&["a", "b"], &["c", "d"], &[]]);
        let mut h = Harness::new(3);

        while !h.play(&deck, &mut battle, false).is_game_over() {}

        let record = h.stats.table().last().unwrap();
        assert_eq!(record.winner, PlayerId::new(0));
        assert_eq!(record.eliminated_at[PlayerId::new(2)], Some(0));
        assert_eq!(record.eliminated_at[PlayerId::new(1)], Some(record.rounds));
    }

    #[test]
    fn test_won_pile_reused_in_order_without_reshuffle() {
        let deck = deck(&[("a9", 9), ("a8", 8), ("b2", 2), ("b1", 1)]);
        let mut battle = battle(&deck, &[&["a8", "a9"], &["b1", "b2"]]);
        let mut h = Harness::new(2);

        h.play(&deck, &mut battle, false);
        h.play(&deck, &mut battle, false);
        assert_eq!(
            names(&deck, &battle.hands[PlayerId::new(0)].won),
            vec!["a9", "b2", "a8", "b1"]
        );

        // Player 2 is out; player 1 promotes the won pile untouched.
        let outcome = h.play(&deck, &mut battle, false);
        assert!(outcome.is_game_over());
        assert_eq!(
            names(&deck, &battle.hands[PlayerId::new(0)].active),
            vec!["a9", "b2", "a8"]
        );
    }

    #[test]
    fn test_long_war_chain_uses_no_recursion() {
        let mut builder = DeckBuilder::new().suit("a").suit("b");
        for rank in 0..2000 {
            builder = builder.rank(rank.to_string(), 7);
        }
        let deck = builder.build().unwrap();
        let hands: Vec<Pile> = ["a", "b"]
            .iter()
            .map(|suit| deck.iter().filter(|c| c.name.ends_with(suit)).map(|c| c.id).collect())
            .collect();
        let mut battle = Battle::new(Deal {
            hands: PlayerMap::new(2, |p| PlayerHand::dealt(hands[p.index()].clone())),
            dropped: Vec::new(),
        });
        let mut h = Harness::new(2);

        let outcome = h.play(&deck, &mut battle, true);

        // Every comparison ties until player 1 runs dry at round 2001.
        assert_eq!(
            outcome,
            RoundOutcome::GameOver {
                winner: PlayerId::new(1),
                rounds: 2000
            }
        );
        assert_eq!(battle.wars(), 1000);
    }

    #[test]
    fn test_clearing_stats_mid_game_keeps_earlier_eliminations() {
        let deck = deck(&[("a", 5), ("b", 4), ("c", 3), ("d", 2), ("e", 1)]);
        let mut battle = battle(&deck, &[&["d"], &["a", "b"], &["e", "c"]]);
        let mut h = Harness::new(3);

        h.play(&deck, &mut battle, false);
        h.play(&deck, &mut battle, false);
        assert!(!battle.is_active(PlayerId::new(0)));

        h.stats.clear();
        let outcome = h.play(&deck, &mut battle, false);

        assert_eq!(
            outcome,
            RoundOutcome::GameOver {
                winner: PlayerId::new(1),
                rounds: 2
            }
        );
        let record = h.stats.table().last().unwrap();
        assert_eq!(h.stats.table().len(), 1);
        assert_eq!(record.winner, PlayerId::new(1));
        assert_eq!(record.eliminated_at[PlayerId::new(0)], Some(1));
        assert_eq!(record.eliminated_at[PlayerId::new(2)], Some(2));
    }

    #[test]
    fn test_concede_to_leader() {
        let deck = deck(&[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]);
        let mut battle = battle(&deck, &[&["a"], &["b", "c", "d"], &["e"]]);
        let mut h = Harness::new(3);

        let outcome = battle.concede_to_leader(&mut h.stats);

        assert_eq!(
            outcome,
            RoundOutcome::GameOver {
                winner: PlayerId::new(1),
                rounds: 0
            }
        );
        let record = h.stats.table().last().unwrap();
        assert_eq!(record.eliminated_at[PlayerId::new(0)], Some(0));
        assert_eq!(record.eliminated_at[PlayerId::new(2)], Some(0));
        assert_eq!(record.winner, PlayerId::new(1));
    }
}
