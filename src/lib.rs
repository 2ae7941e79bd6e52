//! # equilibrium-market
//!
//! Rule engine for a three-seat chip-and-card drafting game.
//!
//! Each of five rounds deals a fresh 40-card deck (20 red, 20 blue) into a
//! four-card market, five times. Every mini-round the three seats reveal a
//! priority chip at once; identical chips clash and drop to the back. Cards
//! are drafted in priority order, and at round end players score for
//! keeping red and blue balanced. A tie between the two leaders is settled
//! by a sudden-death matching game refereed by the third player.
//!
//! ## Design Principles
//!
//! 1. **Pure core**: the engine never renders anything. Presenters see
//!    pending decisions, events and snapshots.
//!
//! 2. **Resumable**: every human input point is an explicit pending
//!    decision. `Game::advance` runs to the next one; `Game::submit`
//!    resumes. Invalid input is rejected without changing state.
//!
//! 3. **Deterministic**: one seed drives independent random streams for the
//!    deck, clashes, coin flips and each AI seat.
//!
//! ## Modules
//!
//! - `core`: seats, chips, cards, player state, RNG, configuration, errors
//! - `rules`: priority resolution, market allocation, scoring, sudden death
//! - `ai`: easy, medium and hard decision policies
//! - `game`: the round controller, events, reports and standings

pub mod ai;
pub mod core;
pub mod game;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Card, CardCounts, Chip, ChipHand, Choice, Controller, Decision, Difficulty, GameConfig, GameError, GameRng,
    PlayerId, PlayerMap, PlayerState, Role, Snapshot,
};

pub use crate::rules::{ScoringCase, SuddenDeathOutcome, SuddenDeathSession, TurnOrder};

pub use crate::game::{EventLog, Game, GameEvent, NullObserver, Observer, Progress, RoundReport, Standings};

pub use crate::ai::{strategy, Strategy};
