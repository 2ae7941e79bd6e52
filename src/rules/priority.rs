//! Chip reveal → turn order.
//!
//! Every player reveals one chip at the same time. A chip kind revealed by
//! more than one player is a clash: each of those players ranks with an
//! effective value of 0. Everyone else ranks with the chip's value. The sort
//! is stable over the reveal order, and equal effective values form a band.
//! Only clashes can share a value, so every multi-player band is a clash.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Chip, PlayerId};

/// One player's revealed chip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub player: PlayerId,
    pub chip: Chip,
}

impl Reveal {
    #[must_use]
    pub const fn new(player: PlayerId, chip: Chip) -> Self {
        Self { player, chip }
    }
}

/// A ranked entry in the turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub player: PlayerId,
    pub chip: Chip,
    /// Chip value, or 0 when the chip clashed.
    pub effective_value: u8,
    pub clashed: bool,
}

/// Players sharing one effective value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    /// Index of the band's first placement in the turn order.
    pub position: usize,
    pub effective_value: u8,
    pub players: SmallVec<[PlayerId; 3]>,
}

impl Band {
    /// A band of two or more players is a clash group.
    #[must_use]
    pub fn is_clash(&self) -> bool {
        self.players.len() > 1
    }
}

/// Ranked turn order for one mini-round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    placements: SmallVec<[Placement; 3]>,
}

impl TurnOrder {
    /// Rank a set of simultaneous reveals.
    ///
    /// ```
    /// use equilibrium_market::core::{Chip, PlayerId};
    /// use equilibrium_market::rules::{Reveal, TurnOrder};
    ///
    /// let order = TurnOrder::resolve(&[
    ///     Reveal::new(PlayerId::You, Chip::Silver),
    ///     Reveal::new(PlayerId::CpuA, Chip::Silver),
    ///     Reveal::new(PlayerId::CpuB, Chip::Bronze),
    /// ]);
    ///
    /// assert_eq!(order.placements()[0].player, PlayerId::CpuB);
    /// assert_eq!(order.bands()[1].players.as_slice(), &[PlayerId::You, PlayerId::CpuA]);
    /// ```
    #[must_use]
    pub fn resolve(reveals: &[Reveal]) -> Self {
        let mut counts: FxHashMap<Chip, usize> = FxHashMap::default();
        for reveal in reveals {
            *counts.entry(reveal.chip).or_insert(0) += 1;
        }

        let mut placements: SmallVec<[Placement; 3]> = reveals
            .iter()
            .map(|reveal| {
                let clashed = counts.get(&reveal.chip).copied().unwrap_or(0) > 1;
                Placement {
                    player: reveal.player,
                    chip: reveal.chip,
                    effective_value: if clashed { 0 } else { reveal.chip.value() },
                    clashed,
                }
            })
            .collect();

        // Stable: equal values keep reveal order.
        placements.sort_by(|a, b| b.effective_value.cmp(&a.effective_value));

        Self { placements }
    }

    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Placements grouped into contiguous bands of equal effective value.
    #[must_use]
    pub fn bands(&self) -> Vec<Band> {
        let mut bands: Vec<Band> = Vec::new();
        for (position, placement) in self.placements.iter().enumerate() {
            match bands.last_mut() {
                Some(band) if band.effective_value == placement.effective_value => {
                    band.players.push(placement.player);
                }
                _ => bands.push(Band {
                    position,
                    effective_value: placement.effective_value,
                    players: SmallVec::from_slice(&[placement.player]),
                }),
            }
        }
        bands
    }

    /// Only the clash groups.
    #[must_use]
    pub fn clash_groups(&self) -> Vec<Band> {
        self.bands().into_iter().filter(Band::is_clash).collect()
    }

    /// Zero-based rank position of a player.
    #[must_use]
    pub fn position_of(&self, player: PlayerId) -> Option<usize> {
        self.placements.iter().position(|p| p.player == player)
    }
}

impl std::fmt::Display for TurnOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, band) in self.bands().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let names: Vec<&str> = band.players.iter().map(|p| p.name()).collect();
            write!(f, "#{} {}", band.position + 1, names.join(" / "))?;
            if band.is_clash() {
                f.write_str(" (tie)")?;
            }
        }
        Ok(())
    }
}
