//! Pending decisions and the choices that resolve them.
//!
//! The engine pauses at exactly one `Decision` at a time. A presenter shows
//! the options, collects one `Choice`, and hands it back through
//! `Game::submit`. Multi-card selections are made one card per submission so
//! the presenter can give feedback after each partial pick.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardCounts};
use super::chip::Chip;
use super::player::PlayerId;

/// Sudden-death role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Scores when both revealed cards share a colour.
    Matcher,
    /// Scores when the revealed colours differ.
    Mismatcher,
}

impl Role {
    #[must_use]
    pub const fn opposite(self) -> Role {
        match self {
            Role::Matcher => Role::Mismatcher,
            Role::Mismatcher => Role::Matcher,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Role::Matcher => "matcher",
            Role::Mismatcher => "mismatcher",
        })
    }
}

/// A decision the engine is waiting on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Commit one chip for this mini-round.
    Chip { player: PlayerId, available: Vec<Chip> },

    /// Take one card from the market; `remaining` picks are still owed,
    /// including this one.
    DraftCard {
        player: PlayerId,
        available: Vec<Card>,
        remaining: usize,
    },

    /// Keep one more card for the sudden-death hand.
    TrimHand {
        player: PlayerId,
        /// Cards not yet kept.
        stock: CardCounts,
        /// Cards kept so far.
        kept: CardCounts,
        /// Slots still to fill, including this one.
        remaining: usize,
        /// Colours that can be kept without making the hand impossible to complete.
        allowed: Vec<Card>,
    },

    /// As arbiter, nominate which finalist chooses a role.
    NominateSelector {
        arbiter: PlayerId,
        candidates: [PlayerId; 2],
    },

    /// Choose matcher or mismatcher.
    ChooseRole { player: PlayerId },

    /// Reveal one card in the colour match.
    RevealCard {
        player: PlayerId,
        role: Role,
        stock: CardCounts,
        /// Match round (1-based) and total.
        round: usize,
        of: usize,
    },
}

impl Decision {
    /// The seat that must answer.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        match self {
            Decision::Chip { player, .. }
            | Decision::DraftCard { player, .. }
            | Decision::TrimHand { player, .. }
            | Decision::ChooseRole { player }
            | Decision::RevealCard { player, .. } => *player,
            Decision::NominateSelector { arbiter, .. } => *arbiter,
        }
    }

    /// Name of the choice kind this decision expects.
    #[must_use]
    pub fn expects(&self) -> &'static str {
        match self {
            Decision::Chip { .. } => "chip",
            Decision::DraftCard { .. } | Decision::TrimHand { .. } | Decision::RevealCard { .. } => "card",
            Decision::NominateSelector { .. } => "nomination",
            Decision::ChooseRole { .. } => "role",
        }
    }
}

/// A single answer to a `Decision`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Chip(Chip),
    Card(Card),
    Nominate(PlayerId),
    Role(Role),
}

impl Choice {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Choice::Chip(_) => "chip",
            Choice::Card(_) => "card",
            Choice::Nominate(_) => "nomination",
            Choice::Role(_) => "role",
        }
    }
}
