//! War game facade: deck, configuration, current game and statistics.

use tracing::debug;

use crate::cards::{CardId, Deck};
use crate::core::{CheatTiming, GameRng, PlayerId, Result, RulesConfig, WarError};
use crate::rules::{self, Battle, BattleContext, RoundOutcome, MIN_PLAYERS};
use crate::stats::{StatsRecorder, StatsTable};
use crate::zones::PlayerHand;

/// A War engine instance.
///
/// Owns the deck and rule configuration (long-lived), the game in progress
/// (created by [`split`](Self::split)), and the statistics table (persists
/// until cleared or the player count changes).
///
/// ## Example
///
/// ```
/// use war_sim::games::war::WarGame;
/// use war_sim::cards::Deck;
///
/// let mut game = WarGame::builder().deck(Deck::standard()).seed(7).build().unwrap();
/// game.play_match(2, 5, 0).unwrap();
///
/// assert_eq!(game.stats().len(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct WarGame {
    deck: Deck,
    config: RulesConfig,
    rng: GameRng,
    stats: StatsRecorder,
    battle: Option<Battle>,
}

/// Builder for creating a WarGame.
#[derive(Clone, Debug, Default)]
pub struct WarGameBuilder {
    deck: Option<Deck>,
    config: RulesConfig,
    cheats: Vec<(Vec<String>, PlayerId)>,
}

impl WarGameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deck to play with. Defaults to [`Deck::standard`].
    pub fn deck(mut self, deck: Deck) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Replace the whole rule configuration.
    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn reshuffle_wins(mut self, reshuffle: bool) -> Self {
        self.config.reshuffle_wins = reshuffle;
        self
    }

    pub fn cheat_timing(mut self, timing: CheatTiming) -> Self {
        self.config.cheat_timing = timing;
        self
    }

    pub fn hand_size(mut self, player: PlayerId, size: usize) -> Self {
        self.config.set_hand_size(player, size);
        self
    }

    /// Assign cards to a player. Validated against the deck in `build`.
    pub fn cheats<S: AsRef<str>>(mut self, cards: &[S], player: PlayerId) -> Self {
        let names = cards.iter().map(|c| c.as_ref().to_owned()).collect();
        self.cheats.push((names, player));
        self
    }

    /// Build the game. Fails if a cheat names a card not in the deck.
    pub fn build(self) -> Result<WarGame> {
        let deck = self.deck.unwrap_or_else(Deck::standard);
        let mut config = self.config;
        for (names, player) in &self.cheats {
            config.add_cheats(&deck, names, *player)?;
        }
        Ok(WarGame::with_config(deck, config))
    }
}

impl WarGame {
    /// Create a game over `deck` with default rules.
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        Self::with_config(deck, RulesConfig::default())
    }

    /// Create a game over `deck` with the given rules.
    ///
    /// Cheats in `config` are checked against the deck at split time.
    #[must_use]
    pub fn with_config(deck: Deck, config: RulesConfig) -> Self {
        Self {
            rng: GameRng::new(config.seed),
            stats: StatsRecorder::new(MIN_PLAYERS),
            deck,
            config,
            battle: None,
        }
    }

    pub fn builder() -> WarGameBuilder {
        WarGameBuilder::new()
    }

    // === Deck ===

    /// The full deck.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Replace the deck. Any game in progress is abandoned unrecorded.
    ///
    /// Cheats naming cards missing from the new deck are kept and rejected
    /// at the next split.
    pub fn set_deck(&mut self, deck: Deck) {
        debug!(cards = deck.len(), abandoned = self.battle.is_some(), "deck replaced");
        self.deck = deck;
        self.abandon();
    }

    // === Configuration ===

    /// The rule configuration.
    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Assign cards to a player (last assignment of a card wins).
    ///
    /// Fails without change if any card is not in the deck.
    pub fn add_cheats<S: AsRef<str>>(&mut self, cards: &[S], player: PlayerId) -> Result<()> {
        self.config.add_cheats(&self.deck, cards, player)
    }

    /// Replace every cheat with the given assignment.
    pub fn set_cheats<S: AsRef<str>>(&mut self, cards: &[S], player: PlayerId) -> Result<()> {
        self.config.set_cheats(&self.deck, cards, player)
    }

    pub fn clear_cheats(&mut self) {
        self.config.clear_cheats();
    }

    #[must_use]
    pub fn cheats(&self) -> &std::collections::BTreeMap<String, PlayerId> {
        self.config.cheats()
    }

    /// Fix a player's starting hand size for future splits.
    pub fn set_hand_size(&mut self, player: PlayerId, size: usize) {
        self.config.set_hand_size(player, size);
    }

    pub fn clear_hand_sizes(&mut self) {
        self.config.clear_hand_sizes();
    }

    #[must_use]
    pub fn hand_sizes(&self) -> &std::collections::BTreeMap<PlayerId, usize> {
        self.config.hand_sizes()
    }

    /// Shuffle won piles when they become the active deck.
    pub fn set_reshuffle_wins(&mut self, reshuffle: bool) {
        self.config.reshuffle_wins = reshuffle;
    }

    #[must_use]
    pub fn reshuffle_wins(&self) -> bool {
        self.config.reshuffle_wins
    }

    pub fn set_cheat_timing(&mut self, timing: CheatTiming) {
        self.config.cheat_timing = timing;
    }

    #[must_use]
    pub fn cheat_timing(&self) -> CheatTiming {
        self.config.cheat_timing
    }

    /// Restart the random stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = GameRng::new(seed);
    }

    // === Game control ===

    /// Deal a new game for `player_count` players.
    ///
    /// A change of player count resets the statistics table. On error
    /// nothing changes: the previous game, statistics and random stream
    /// are left as they were.
    pub fn split(&mut self, player_count: usize) -> Result<()> {
        let dealt = rules::deal(&self.deck, &self.config, player_count, &mut self.rng)?;
        self.stats.discard_pending();
        self.stats.ensure_shape(player_count);
        self.battle = Some(Battle::new(dealt));
        Ok(())
    }

    /// Play one round-step of the current game.
    ///
    /// After the game ends this repeats the final result without changing
    /// the round counter or the statistics.
    pub fn play_round(&mut self) -> Result<RoundOutcome> {
        let battle = self.battle.as_mut().ok_or(WarError::NoGameInProgress)?;
        let mut ctx = BattleContext {
            deck: &self.deck,
            reshuffle_wins: self.config.reshuffle_wins,
            rng: &mut self.rng,
            stats: &mut self.stats,
        };
        Ok(battle.play_round(&mut ctx))
    }

    /// Play the current game to the end and return the winner.
    ///
    /// With `max_rounds > 0` the game stops once the round counter reaches
    /// the ceiling and the player holding the most cards wins. The ceiling
    /// is checked between round-steps, so a war in progress finishes first.
    pub fn play_until_done(&mut self, max_rounds: u32) -> Result<PlayerId> {
        let battle = self.battle.as_mut().ok_or(WarError::NoGameInProgress)?;
        loop {
            if let Some(winner) = battle.winner() {
                return Ok(winner);
            }
            if max_rounds > 0 && battle.round() >= max_rounds {
                return Ok(battle.concede_to_leader(&mut self.stats).winner());
            }
            let mut ctx = BattleContext {
                deck: &self.deck,
                reshuffle_wins: self.config.reshuffle_wins,
                rng: &mut self.rng,
                stats: &mut self.stats,
            };
            battle.play_round(&mut ctx);
        }
    }

    /// Split and play one full game.
    pub fn play(&mut self, player_count: usize, max_rounds: u32) -> Result<PlayerId> {
        self.split(player_count)?;
        self.play_until_done(max_rounds)
    }

    /// Play `matches` full games and return a snapshot of the statistics.
    pub fn play_match(
        &mut self,
        player_count: usize,
        matches: usize,
        max_rounds: u32,
    ) -> Result<StatsTable> {
        rules::check_player_count(&self.deck, player_count)?;
        for _ in 0..matches {
            self.play(player_count, max_rounds)?;
        }
        debug!(players = player_count, matches, recorded = self.stats.table().len(), "matches played");
        Ok(self.stats.snapshot())
    }

    // === Observability ===

    /// Current round, or the match total once the game is over. 0 before
    /// any split.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.battle.as_ref().map_or(0, Battle::round)
    }

    /// Winner of the current game, `None` while it is still being played.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.battle.as_ref().and_then(Battle::winner)
    }

    /// Players in the current game, 0 before any split.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.battle.as_ref().map_or(0, Battle::player_count)
    }

    /// Whether a player is still in the current game.
    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.battle.as_ref().is_some_and(|b| b.is_active(player))
    }

    /// A player's hand in the current game.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Option<&PlayerHand> {
        self.battle.as_ref().and_then(|b| b.hand(player))
    }

    /// Cards dropped by the current game's split.
    #[must_use]
    pub fn dropped(&self) -> &[CardId] {
        match &self.battle {
            Some(battle) => battle.dropped(),
            None => &[],
        }
    }

    /// O(1) snapshot of the statistics table.
    #[must_use]
    pub fn stats(&self) -> StatsTable {
        self.stats.snapshot()
    }

    /// Remove every recorded match.
    pub fn clear_stats(&mut self) {
        self.stats.clear();
    }

    fn abandon(&mut self) {
        self.battle = None;
        self.stats.discard_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_round_requires_split() {
        let mut game = WarGame::new(Deck::standard());

        assert_eq!(game.play_round(), Err(WarError::NoGameInProgress));
        assert_eq!(game.play_until_done(0), Err(WarError::NoGameInProgress));
        assert_eq!(game.round(), 0);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_builder_rejects_unknown_cheat() {
        let result = WarGame::builder().cheats(&["Z-Heart"], PlayerId::new(0)).build();

        assert_eq!(
            result.map(|_| ()),
            Err(WarError::UnknownCard {
                name: "Z-Heart".into()
            })
        );
    }

    #[test]
    fn test_failed_split_keeps_game() {
        let mut game = WarGame::builder().seed(3).build().unwrap();
        game.split(2).unwrap();
        game.play_round().unwrap();
        let round = game.round();

        assert!(game.split(1).is_err());
        assert!(game.split(53).is_err());
        assert_eq!(game.round(), round);
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn test_set_deck_abandons_game() {
        let mut game = WarGame::builder().seed(3).build().unwrap();
        game.split(2).unwrap();
        game.play_round().unwrap();

        game.set_deck(Deck::standard());

        assert_eq!(game.player_count(), 0);
        assert_eq!(game.play_round(), Err(WarError::NoGameInProgress));
        assert!(game.stats().is_empty());
    }

    #[test]
    fn test_same_seed_same_match() {
        let play = || {
            let mut game = WarGame::builder().seed(99).build().unwrap();
            game.play_match(3, 4, 0).unwrap()
        };

        let a = play();
        let b = play();
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_config_passthrough() {
        let mut game = WarGame::new(Deck::standard());
        game.set_reshuffle_wins(false);
        game.set_cheat_timing(CheatTiming::PostSplit);
        game.set_hand_size(PlayerId::new(0), 5);
        game.add_cheats(&["A-Heart"], PlayerId::new(1)).unwrap();

        assert!(!game.reshuffle_wins());
        assert_eq!(game.cheat_timing(), CheatTiming::PostSplit);
        assert_eq!(game.hand_sizes().get(&PlayerId::new(0)), Some(&5));
        assert_eq!(game.cheats().get("A-Heart"), Some(&PlayerId::new(1)));

        game.clear_cheats();
        game.clear_hand_sizes();
        assert!(game.cheats().is_empty());
        assert!(game.hand_sizes().is_empty());
    }
}
