//! Computer opponents.
//!
//! A difficulty tier selects a `Strategy`: a table of plain functions for
//! each kind of decision the engine asks an AI to make. Tiers share
//! functions where their behaviour is the same.
//!
//! | tier   | chip                   | draft   | trim     | role      |
//! |--------|------------------------|---------|----------|-----------|
//! | easy   | random                 | random  | random   | random    |
//! | medium | balance, save gold     | balance | minority | random    |
//! | hard   | medium, push with gold | balance | minority | hand skew |

pub mod policy;

pub use policy::{
    desired_card, nominate_random, play_chip, reveal_random, take_preferring, trim_minority, trim_random,
    ChipContext,
};

use crate::core::{Card, CardCounts, Chip, Difficulty, GameRng, Role};

/// Chooses a preferred chip. `None` when the hand is empty.
pub type ChipPolicy = fn(&ChipContext<'_>, &mut GameRng) -> Option<Chip>;

/// Picks `count` cards from the available pool, given the AI's own counts.
pub type DraftPolicy = fn(&[Card], usize, CardCounts, &mut GameRng) -> Vec<Card>;

/// Reduces a sudden-death hand to the given size.
pub type TrimPolicy = fn(CardCounts, u32, &mut GameRng) -> CardCounts;

/// Chooses a sudden-death role from the (trimmed) hand.
pub type RolePolicy = fn(CardCounts, &mut GameRng) -> Role;

/// Decision functions for one difficulty tier.
#[derive(Clone, Copy)]
pub struct Strategy {
    pub chip: ChipPolicy,
    pub draft: DraftPolicy,
    pub trim: TrimPolicy,
    pub role: RolePolicy,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").finish_non_exhaustive()
    }
}

pub static EASY: Strategy = Strategy {
    chip: policy::chip_easy,
    draft: policy::draft_easy,
    trim: policy::trim_random,
    role: policy::role_random,
};

pub static MEDIUM: Strategy = Strategy {
    chip: policy::chip_medium,
    draft: policy::draft_balancing,
    trim: policy::trim_minority,
    role: policy::role_random,
};

pub static HARD: Strategy = Strategy {
    chip: policy::chip_hard,
    draft: policy::draft_balancing,
    trim: policy::trim_minority,
    role: policy::role_by_skew,
};

/// The strategy table for a tier.
#[must_use]
pub fn strategy(difficulty: Difficulty) -> &'static Strategy {
    match difficulty {
        Difficulty::Easy => &EASY,
        Difficulty::Medium => &MEDIUM,
        Difficulty::Hard => &HARD,
    }
}
