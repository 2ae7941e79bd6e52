//! Final ranking by total victory points.
//!
//! Ranking is competition style: equal totals share a rank and the next
//! distinct total skips ahead (1, 1, 3). Entries with the same total keep
//! seat order.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// One line of the final ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// 1-based rank.
    pub rank: usize,
    pub player: PlayerId,
    pub vp: u32,
    /// Whether another player shares this rank.
    pub tied: bool,
}

/// Final ranking of all seats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    entries: Vec<StandingEntry>,
}

impl Standings {
    /// Rank seats by total VP, descending.
    ///
    /// ```
    /// use equilibrium_market::core::{PlayerId, PlayerMap};
    /// use equilibrium_market::game::Standings;
    ///
    /// let vp = PlayerMap::new(|p| match p {
    ///     PlayerId::You => 12,
    ///     PlayerId::CpuA => 20,
    ///     PlayerId::CpuB => 12,
    /// });
    /// let standings = Standings::from_scores(&vp);
    ///
    /// assert_eq!(standings.leaders(), vec![PlayerId::CpuA]);
    /// assert_eq!(standings.rank_of(PlayerId::CpuB), Some(2));
    /// assert_eq!(standings.to_string(), "1. cpuA 20 VP\n=2. you 12 VP\n=2. cpuB 12 VP");
    /// ```
    #[must_use]
    pub fn from_scores(vp: &PlayerMap<u32>) -> Self {
        let mut ranked = PlayerId::ALL;
        ranked.sort_by(|a, b| vp[*b].cmp(&vp[*a]));

        let entries = ranked
            .iter()
            .enumerate()
            .map(|(i, &player)| {
                let score = vp[player];
                let rank = ranked.iter().position(|&p| vp[p] == score).unwrap_or(i) + 1;
                let tied = ranked.iter().filter(|&&p| vp[p] == score).count() > 1;
                StandingEntry {
                    rank,
                    player,
                    vp: score,
                    tied,
                }
            })
            .collect();

        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[StandingEntry] {
        &self.entries
    }

    /// Every player sharing rank 1.
    #[must_use]
    pub fn leaders(&self) -> Vec<PlayerId> {
        self.entries
            .iter()
            .filter(|e| e.rank == 1)
            .map(|e| e.player)
            .collect()
    }

    #[must_use]
    pub fn rank_of(&self, player: PlayerId) -> Option<usize> {
        self.entries.iter().find(|e| e.player == player).map(|e| e.rank)
    }

    /// Total VP of a seat.
    #[must_use]
    pub fn vp_of(&self, player: PlayerId) -> Option<u32> {
        self.entries.iter().find(|e| e.player == player).map(|e| e.vp)
    }
}

impl std::fmt::Display for Standings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            let marker = if entry.tied { "=" } else { "" };
            write!(f, "{marker}{}. {} {} VP", entry.rank, entry.player, entry.vp)?;
        }
        Ok(())
    }
}
