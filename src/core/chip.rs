//! Priority chips and the per-round chip hand.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A priority chip. Played face-down once per mini-round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chip {
    Gold,
    Silver,
    Bronze,
}

impl Chip {
    /// All chip kinds, highest value first.
    pub const ALL: [Chip; 3] = [Chip::Gold, Chip::Silver, Chip::Bronze];

    /// Priority value of the chip when it is not part of a clash.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Chip::Gold => 3,
            Chip::Silver => 2,
            Chip::Bronze => 1,
        }
    }
}

impl std::fmt::Display for Chip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Chip::Gold => "gold",
            Chip::Silver => "silver",
            Chip::Bronze => "bronze",
        };
        f.write_str(name)
    }
}

/// Chips every player holds at the start of a round.
pub const STARTING_CHIPS: [Chip; 5] = [Chip::Gold, Chip::Silver, Chip::Silver, Chip::Bronze, Chip::Bronze];

/// A player's remaining chips for the current round.
///
/// Removal is by value: the hand is a multiset and the position of a chip
/// carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipHand {
    chips: SmallVec<[Chip; 5]>,
}

impl ChipHand {
    /// The full starting hand: gold ×1, silver ×2, bronze ×2.
    #[must_use]
    pub fn full() -> Self {
        Self {
            chips: SmallVec::from_slice(&STARTING_CHIPS),
        }
    }

    /// An empty hand.
    #[must_use]
    pub fn empty() -> Self {
        Self { chips: SmallVec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    #[must_use]
    pub fn contains(&self, chip: Chip) -> bool {
        self.chips.contains(&chip)
    }

    /// How many chips of one kind remain.
    #[must_use]
    pub fn count(&self, chip: Chip) -> usize {
        self.chips.iter().filter(|&&c| c == chip).count()
    }

    /// Remaining chips in hand order.
    #[must_use]
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Distinct chip kinds still held, highest value first.
    #[must_use]
    pub fn kinds(&self) -> Vec<Chip> {
        Chip::ALL.into_iter().filter(|&c| self.contains(c)).collect()
    }

    /// Remove one chip of the given kind. `None` if none is held.
    pub fn take(&mut self, chip: Chip) -> Option<Chip> {
        let index = self.chips.iter().position(|&c| c == chip)?;
        Some(self.chips.remove(index))
    }

    /// Remove the chip at a hand position. `None` if out of range.
    pub fn take_at(&mut self, index: usize) -> Option<Chip> {
        (index < self.chips.len()).then(|| self.chips.remove(index))
    }
}

impl Default for ChipHand {
    fn default() -> Self {
        Self::full()
    }
}
