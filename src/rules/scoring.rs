//! End-of-round scoring.
//!
//! ## Basic points
//!
//! Each player's |red - blue| maps to basic points: 0 → 10, 1 → 8, 2 → 6,
//! 3 → 4, 4 → 2, anything larger → 0.
//!
//! ## Cases
//!
//! Players are ranked by basic points (stable over seat order) into p1, p2,
//! p3, and exactly one case applies:
//!
//! - **Sudden death**: p1 > 0, p1 == p2 and p1 > p3. The two leaders play the
//!   tie-break with p3 as arbiter. Both finalists score p1's basic points, the
//!   winner also scores the bonus, and the third player scores nothing.
//! - **Inverted reward**: p1 > p2 > p3. Only the third player scores, and it
//!   scores its own basic points.
//! - **Confiscated**: anything else. Nobody scores.

use serde::{Deserialize, Serialize};

use crate::core::{CardCounts, PlayerId, PlayerMap};

/// Basic points indexed by |red - blue|.
pub const BASIC_POINTS: [u32; 5] = [10, 8, 6, 4, 2];

/// Basic points for one imbalance.
#[must_use]
pub fn basic_points(abs_difference: u32) -> u32 {
    BASIC_POINTS.get(abs_difference as usize).copied().unwrap_or(0)
}

/// Basic points of every seat from their round-end card counts.
#[must_use]
pub fn basic_points_for(cards: &PlayerMap<CardCounts>) -> PlayerMap<u32> {
    cards.map(|_, counts| basic_points(counts.abs_difference()))
}

/// Seats ordered by basic points descending, ties kept in seat order.
#[must_use]
pub fn rank_by_basic(basic: &PlayerMap<u32>) -> [PlayerId; 3] {
    let mut ranked = PlayerId::ALL;
    ranked.sort_by(|a, b| basic[*b].cmp(&basic[*a]));
    ranked
}

/// Which scoring rule applies to a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "case", rename_all = "snake_case")]
pub enum ScoringCase {
    /// Two leaders tied above the third: tie-break needed.
    SuddenDeath {
        finalists: [PlayerId; 2],
        arbiter: PlayerId,
        /// The finalists' shared basic points.
        basic: u32,
    },
    /// Strictly ordered: the last-placed player scores its basic points.
    InvertedReward { third: PlayerId, points: u32 },
    /// No one scores.
    Confiscated,
}

impl ScoringCase {
    /// Classify a round from every seat's basic points.
    #[must_use]
    pub fn classify(basic: &PlayerMap<u32>) -> Self {
        let [p1, p2, p3] = rank_by_basic(basic);
        let (b1, b2, b3) = (basic[p1], basic[p2], basic[p3]);

        if b1 > 0 && b1 == b2 && b1 > b3 {
            ScoringCase::SuddenDeath {
                finalists: [p1, p2],
                arbiter: p3,
                basic: b1,
            }
        } else if b1 > b2 && b2 > b3 {
            ScoringCase::InvertedReward { third: p3, points: b3 }
        } else {
            ScoringCase::Confiscated
        }
    }

    /// Short label for logs and reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            ScoringCase::SuddenDeath { .. } => "sudden death",
            ScoringCase::InvertedReward { .. } => "inverted reward",
            ScoringCase::Confiscated => "confiscated",
        }
    }

    /// Deltas for the cases that need no tie-break. `None` for sudden death.
    #[must_use]
    pub fn direct_deltas(&self) -> Option<PlayerMap<u32>> {
        match *self {
            ScoringCase::SuddenDeath { .. } => None,
            ScoringCase::InvertedReward { third, points } => {
                let mut deltas = PlayerMap::with_value(0);
                deltas[third] = points;
                Some(deltas)
            }
            ScoringCase::Confiscated => Some(PlayerMap::with_value(0)),
        }
    }
}

/// Deltas after a sudden-death tie-break.
#[must_use]
pub fn sudden_death_deltas(basic: u32, winner: PlayerId, loser: PlayerId, bonus: u32) -> PlayerMap<u32> {
    let mut deltas = PlayerMap::with_value(0);
    deltas[winner] = basic + bonus;
    deltas[loser] = basic;
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(you: u32, cpu_a: u32, cpu_b: u32) -> PlayerMap<u32> {
        let mut map = PlayerMap::with_value(0);
        map[PlayerId::You] = you;
        map[PlayerId::CpuA] = cpu_a;
        map[PlayerId::CpuB] = cpu_b;
        map
    }

    #[test]
    fn test_basic_points_table() {
        let table: Vec<u32> = (0..=6).map(basic_points).collect();
        assert_eq!(table, vec![10, 8, 6, 4, 2, 0, 0]);
        assert_eq!(basic_points(20), 0);
    }

    #[test]
    fn test_basic_points_from_counts() {
        let mut cards = PlayerMap::with_default();
        cards[PlayerId::You] = CardCounts::new(3, 3);
        cards[PlayerId::CpuA] = CardCounts::new(5, 2);
        cards[PlayerId::CpuB] = CardCounts::new(0, 7);

        assert_eq!(basic_points_for(&cards), basic(10, 4, 0));
    }

    #[test]
    fn test_rank_is_stable_over_seat_order() {
        assert_eq!(
            rank_by_basic(&basic(6, 10, 6)),
            [PlayerId::CpuA, PlayerId::You, PlayerId::CpuB]
        );
    }

    #[test]
    fn test_tied_leaders_go_to_sudden_death() {
        let case = ScoringCase::classify(&basic(10, 6, 10));
        assert_eq!(
            case,
            ScoringCase::SuddenDeath {
                finalists: [PlayerId::You, PlayerId::CpuB],
                arbiter: PlayerId::CpuA,
                basic: 10,
            }
        );
        assert_eq!(case.direct_deltas(), None);
    }

    #[test]
    fn test_strict_order_rewards_third() {
        let case = ScoringCase::classify(&basic(10, 8, 6));
        assert_eq!(case, ScoringCase::InvertedReward { third: PlayerId::CpuB, points: 6 });
        assert_eq!(case.direct_deltas(), Some(basic(0, 0, 6)));
    }

    #[test]
    fn test_three_way_tie_is_confiscated() {
        let case = ScoringCase::classify(&basic(10, 10, 10));
        assert_eq!(case, ScoringCase::Confiscated);
        assert_eq!(case.direct_deltas(), Some(basic(0, 0, 0)));
    }

    #[test]
    fn test_tied_trailers_are_confiscated() {
        assert_eq!(ScoringCase::classify(&basic(10, 6, 6)), ScoringCase::Confiscated);
    }

    #[test]
    fn test_tied_leaders_at_zero_are_confiscated() {
        assert_eq!(ScoringCase::classify(&basic(0, 0, 0)), ScoringCase::Confiscated);
    }

    #[test]
    fn test_sudden_death_deltas() {
        let deltas = sudden_death_deltas(8, PlayerId::CpuA, PlayerId::You, 3);
        assert_eq!(deltas, basic(8, 11, 0));
    }
}
