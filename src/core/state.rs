//! Per-seat player state and the public snapshot pushed to presenters.
//!
//! ## PlayerState
//!
//! Victory points persist for the whole game. Chips, collected cards and
//! the committed chip are round-scoped and reset by `reset_round`.
//!
//! ## Snapshot
//!
//! Read-only view of everything a presenter may show. Chips committed in
//! the current mini-round stay hidden until the reveal.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardCounts};
use super::chip::{Chip, ChipHand};
use super::config::Controller;
use super::player::{PlayerId, PlayerMap};

/// State of one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub controller: Controller,

    /// Victory points, cumulative across rounds.
    pub vp: u32,

    /// Chips not yet played this round.
    pub chips: ChipHand,

    /// Cards collected this round.
    pub cards: CardCounts,

    /// Chip committed in the current mini-round.
    pub played_chip: Option<Chip>,
}

impl PlayerState {
    #[must_use]
    pub fn new(id: PlayerId, controller: Controller) -> Self {
        Self {
            id,
            controller,
            vp: 0,
            chips: ChipHand::full(),
            cards: CardCounts::default(),
            played_chip: None,
        }
    }

    /// Restore the full chip hand and clear collected cards.
    pub fn reset_round(&mut self) {
        self.chips = ChipHand::full();
        self.cards = CardCounts::default();
        self.played_chip = None;
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        self.controller.is_human()
    }
}

/// What every seat's remaining chips look like, as shown to AI policies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipView {
    remaining: PlayerMap<ChipHand>,
}

impl ChipView {
    /// Capture the remaining chips of every seat.
    #[must_use]
    pub fn capture(players: &PlayerMap<PlayerState>) -> Self {
        Self {
            remaining: players.map(|_, p| p.chips.clone()),
        }
    }

    /// Remaining chips of one seat.
    #[must_use]
    pub fn remaining(&self, player: PlayerId) -> &ChipHand {
        &self.remaining[player]
    }

    /// Whether any seat other than `me` still holds a chip of this kind.
    #[must_use]
    pub fn others_hold(&self, me: PlayerId, chip: Chip) -> bool {
        me.others().any(|p| self.remaining[p].contains(chip))
    }
}

/// Public view of one seat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub vp: u32,
    pub cards: CardCounts,
    pub chips_remaining: usize,
    /// Only set once the mini-round's chips have been revealed.
    pub revealed_chip: Option<Chip>,
}

/// Public game state for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current round (1-based, 0 before the first round).
    pub round: u8,
    /// Current mini-round (1-based, 0 between rounds).
    pub mini_round: u8,
    pub market: Vec<Card>,
    pub deck_remaining: usize,
    pub seats: PlayerMap<SeatView>,
}
