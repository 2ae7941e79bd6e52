//! Errors surfaced to whoever drives the game.
//!
//! Only rejected submissions are visible to callers. A rejected submission
//! leaves the game exactly as it was; the same decision stays pending.

use thiserror::Error;

use super::player::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// The choice names something the player cannot take right now.
    #[error("invalid selection by {player}: {reason}")]
    InvalidSelection { player: PlayerId, reason: String },

    /// The choice is of the wrong kind for the pending decision.
    #[error("expected {expected}, got {got}")]
    UnexpectedChoice {
        expected: &'static str,
        got: &'static str,
    },

    /// Nothing is waiting for input; call `advance` first.
    #[error("no decision is pending")]
    NoPendingDecision,

    /// The game has already produced final standings.
    #[error("the game is finished")]
    GameFinished,
}

impl GameError {
    pub(crate) fn invalid(player: PlayerId, reason: impl Into<String>) -> Self {
        GameError::InvalidSelection {
            player,
            reason: reason.into(),
        }
    }

    /// Whether the same decision can be re-offered.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, GameError::InvalidSelection { .. } | GameError::UnexpectedChoice { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GameError::invalid(PlayerId::You, "no gold chip left");
        assert_eq!(err.to_string(), "invalid selection by you: no gold chip left");
        assert!(err.is_rejection());
        assert!(!GameError::GameFinished.is_rejection());
    }
}
