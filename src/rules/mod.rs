//! Game rules, independent of flow control.
//!
//! - `priority`: chip reveal to turn order, with clash detection
//! - `market`: allocation of market cards along the turn order
//! - `scoring`: basic points and the three end-of-round cases
//! - `sudden_death`: the tie-break between two leaders

pub mod market;
pub mod priority;
pub mod scoring;
pub mod sudden_death;

pub use market::{plan, quota, resolve_clash, take_drafted, AllocationStep, ClashResult};
pub use priority::{Band, Placement, Reveal, TurnOrder};
pub use scoring::{basic_points, rank_by_basic, sudden_death_deltas, ScoringCase, BASIC_POINTS};
pub use sudden_death::{
    allowed_keeps, can_keep, trim_minimums, Finalist, SessionEvent, SessionStatus, SuddenDeathOutcome, SuddenDeathSession,
};

/// Rounds per game.
pub const ROUNDS: u8 = 5;

/// Mini-rounds per round.
pub const MINI_ROUNDS: u8 = 5;
