//! Core types: seats, chips, cards, player state, RNG, configuration,
//! decisions and errors.
//!
//! Nothing here knows about game flow. The rules and the controller are
//! built on top of these types.

pub mod card;
pub mod chip;
pub mod config;
pub mod decision;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use card::{count_of, Card, CardCounts, Market, ResourceDeck};
pub use chip::{Chip, ChipHand, STARTING_CHIPS};
pub use config::{Controller, Difficulty, GameConfig, ParseDifficultyError};
pub use decision::{Choice, Decision, Role};
pub use error::GameError;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{ChipView, PlayerState, SeatView, Snapshot};
