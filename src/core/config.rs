//! Game configuration.
//!
//! The only rule-affecting setting is the difficulty tier of each computer
//! seat. Everything else (seed, autopilot) controls how a game is driven,
//! never what the rules are.

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};

/// AI difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown difficulty name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
pub struct ParseDifficultyError(pub String);

impl std::str::FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Who makes the decisions for a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Decisions arrive through `Game::submit`.
    Human,
    /// Decisions come from the tier's policy set.
    Ai(Difficulty),
}

impl Controller {
    #[must_use]
    pub const fn is_human(self) -> bool {
        matches!(self, Controller::Human)
    }

    /// The tier for AI seats, `None` for the human.
    #[must_use]
    pub const fn difficulty(self) -> Option<Difficulty> {
        match self {
            Controller::Human => None,
            Controller::Ai(d) => Some(d),
        }
    }
}

/// Complete game configuration, supplied once before a game starts.
///
/// ```
/// use equilibrium_market::core::{Controller, Difficulty, GameConfig, PlayerId};
///
/// let config = GameConfig::new()
///     .with_seed(7)
///     .with_difficulty(PlayerId::CpuA, Difficulty::Hard);
///
/// assert_eq!(config.controller(PlayerId::CpuA), Controller::Ai(Difficulty::Hard));
/// assert_eq!(config.controller(PlayerId::You), Controller::Human);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random stream in the game.
    pub seed: u64,

    /// Tier of the first computer opponent.
    pub cpu_a: Difficulty,

    /// Tier of the second computer opponent.
    pub cpu_b: Difficulty,

    /// When set, the `You` seat is played by this tier instead of a human.
    pub autopilot: Option<Difficulty>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            cpu_a: Difficulty::Medium,
            cpu_b: Difficulty::Medium,
            autopilot: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with medium opponents and seed 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the tier of a computer seat. Setting the `You` seat enables autopilot.
    #[must_use]
    pub fn with_difficulty(mut self, seat: PlayerId, difficulty: Difficulty) -> Self {
        match seat {
            PlayerId::You => self.autopilot = Some(difficulty),
            PlayerId::CpuA => self.cpu_a = difficulty,
            PlayerId::CpuB => self.cpu_b = difficulty,
        }
        self
    }

    /// Let an AI tier play the `You` seat.
    #[must_use]
    pub fn with_autopilot(mut self, difficulty: Difficulty) -> Self {
        self.autopilot = Some(difficulty);
        self
    }

    /// Controller of a seat under this configuration.
    #[must_use]
    pub fn controller(&self, seat: PlayerId) -> Controller {
        match seat {
            PlayerId::You => self.autopilot.map_or(Controller::Human, Controller::Ai),
            PlayerId::CpuA => Controller::Ai(self.cpu_a),
            PlayerId::CpuB => Controller::Ai(self.cpu_b),
        }
    }

    /// Controllers of all seats.
    #[must_use]
    pub fn controllers(&self) -> PlayerMap<Controller> {
        PlayerMap::new(|seat| self.controller(seat))
    }
}
