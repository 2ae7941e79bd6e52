//! Per-round scoring record.

use serde::{Deserialize, Serialize};

use crate::core::{CardCounts, GameRngState, PlayerId, PlayerMap};
use crate::rules::{ScoringCase, SuddenDeathOutcome};

/// What happened at the end of one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: u8,
    /// Cards each seat held at round end.
    pub cards: PlayerMap<CardCounts>,
    pub basic: PlayerMap<u32>,
    pub case: ScoringCase,
    pub sudden_death: Option<SuddenDeathOutcome>,
    /// VP added to each seat this round.
    pub deltas: PlayerMap<u32>,
    /// Cards drawn from the deck this round.
    pub dealt: usize,
    pub discarded: usize,
    /// Mini-rounds actually played.
    pub mini_rounds: u8,
    /// The deck ran out before all mini-rounds were played.
    pub ended_early: bool,
    /// Deck stream before the shuffle. `GameRng::from_state` replays the deal.
    pub deck_rng: GameRngState,
}

impl RoundReport {
    /// VP gained by one seat this round.
    #[must_use]
    pub fn delta(&self, player: PlayerId) -> u32 {
        self.deltas[player]
    }
}
