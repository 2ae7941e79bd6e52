//! Seat identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! The game always seats exactly three participants: the human (`You`) and
//! two computer opponents. Seat order (`You`, `CpuA`, `CpuB`) is the
//! tie-break order wherever the rules sort players stably.
//!
//! ## PlayerMap
//!
//! Fixed-size per-seat storage backed by an array for O(1) access.
//! Supports iteration and indexing by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the three seats at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerId {
    You,
    CpuA,
    CpuB,
}

impl PlayerId {
    /// Number of seats.
    pub const COUNT: usize = 3;

    /// All seats in seat order.
    pub const ALL: [PlayerId; 3] = [PlayerId::You, PlayerId::CpuA, PlayerId::CpuB];

    /// Get the seat index (0-based, seat order).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::You => 0,
            PlayerId::CpuA => 1,
            PlayerId::CpuB => 2,
        }
    }

    /// Iterate over all seats in seat order.
    ///
    /// ```
    /// use equilibrium_market::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all().collect();
    /// assert_eq!(seats, vec![PlayerId::You, PlayerId::CpuA, PlayerId::CpuB]);
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        Self::ALL.into_iter()
    }

    /// Iterate over the two seats other than this one.
    pub fn others(self) -> impl Iterator<Item = PlayerId> {
        Self::all().filter(move |&p| p != self)
    }

    /// Stable short name used in logs, events, JSON and RNG stream names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerId::You => "you",
            PlayerId::CpuA => "cpuA",
            PlayerId::CpuB => "cpuB",
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use equilibrium_market::core::{PlayerId, PlayerMap};
///
/// let mut vp: PlayerMap<u32> = PlayerMap::with_value(0);
/// vp[PlayerId::CpuA] += 6;
/// assert_eq!(vp[PlayerId::CpuA], 6);
/// assert_eq!(vp.values().sum::<u32>(), 6);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 3],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each seat.
    pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::ALL.map(&mut factory),
        }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Build a new map by transforming every entry.
    pub fn map<U>(&self, mut f: impl FnMut(PlayerId, &T) -> U) -> PlayerMap<U> {
        PlayerMap::new(|p| f(p, self.get(p)))
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
