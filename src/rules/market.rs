//! Market allocation: who gets which cards after the reveal.
//!
//! The turn order is turned into a short plan of steps:
//! - a single-player band drafts `min(quota, market size)` cards, where the
//!   quota is 2 for the first position and 1 for the second and third;
//! - a clash band takes the *whole* remaining market: it is shuffled and
//!   dealt one card per clashing player, and whatever is left is discarded.
//!
//! Because a clash empties the market, anything ranked below a clash gets
//! nothing. The controller executes the plan step by step so that a human
//! draft can pause the engine.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::{Card, GameRng, Market, PlayerId};

use super::priority::TurnOrder;

/// Nominal cards per turn-order position.
pub const POSITION_QUOTAS: [usize; 3] = [2, 1, 1];

/// Nominal quota of a turn-order position.
#[must_use]
pub fn quota(position: usize) -> usize {
    POSITION_QUOTAS.get(position).copied().unwrap_or(0)
}

/// One step of a mini-round's allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStep {
    /// A lone player drafts up to `quota` cards.
    Draft { player: PlayerId, quota: usize },
    /// A clash group shares out the whole remaining market.
    Clash { players: SmallVec<[PlayerId; 3]> },
}

/// Plan the allocation steps for a turn order.
#[must_use]
pub fn plan(order: &TurnOrder) -> SmallVec<[AllocationStep; 3]> {
    order
        .bands()
        .into_iter()
        .map(|band| {
            if band.is_clash() {
                AllocationStep::Clash { players: band.players }
            } else {
                AllocationStep::Draft {
                    player: band.players[0],
                    quota: quota(band.position),
                }
            }
        })
        .collect()
}

/// Cards dealt to a clash group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashResult {
    /// The market as it stood when the clash was resolved.
    pub pool: Vec<Card>,
    /// One entry per clashing player who received a card, in deal order.
    pub awards: Vec<(PlayerId, Card)>,
    pub discarded: Vec<Card>,
}

/// Resolve a clash: shuffle the entire market and deal one card to each
/// clashing player until players or cards run out. The rest is discarded.
pub fn resolve_clash(players: &[PlayerId], market: &mut Market, rng: &mut GameRng) -> ClashResult {
    let pool = market.drain();
    let mut deck = pool.clone();
    rng.shuffle(&mut deck);

    let mut awards = Vec::with_capacity(players.len());
    for &player in players {
        match deck.pop() {
            Some(card) => awards.push((player, card)),
            None => break,
        }
    }

    debug!(?players, ?pool, awarded = awards.len(), discarded = deck.len(), "clash resolved");

    ClashResult {
        pool,
        awards,
        discarded: deck,
    }
}

/// Remove a drafter's picks from the market in the order given, taking at
/// most `count`. Picks the market no longer holds are skipped.
pub fn take_drafted(market: &mut Market, picks: &[Card], count: usize) -> Vec<Card> {
    picks
        .iter()
        .filter_map(|&card| market.take(card))
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Chip;
    use crate::rules::Reveal;

    fn order(chips: [Chip; 3]) -> TurnOrder {
        let reveals: Vec<_> = PlayerId::ALL
            .into_iter()
            .zip(chips)
            .map(|(p, c)| Reveal::new(p, c))
            .collect();
        TurnOrder::resolve(&reveals)
    }

    #[test]
    fn test_quota_by_position() {
        assert_eq!(quota(0), 2);
        assert_eq!(quota(1), 1);
        assert_eq!(quota(2), 1);
        assert_eq!(quota(3), 0);
    }

    #[test]
    fn test_plan_without_clash() {
        let steps = plan(&order([Chip::Bronze, Chip::Gold, Chip::Silver]));
        assert_eq!(
            steps.as_slice(),
            &[
                AllocationStep::Draft { player: PlayerId::CpuA, quota: 2 },
                AllocationStep::Draft { player: PlayerId::CpuB, quota: 1 },
                AllocationStep::Draft { player: PlayerId::You, quota: 1 },
            ]
        );
    }

    #[test]
    fn test_plan_with_clash() {
        let steps = plan(&order([Chip::Gold, Chip::Bronze, Chip::Gold]));
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], AllocationStep::Draft { player: PlayerId::CpuA, quota: 2 });
        assert!(matches!(&steps[1], AllocationStep::Clash { players } if players.len() == 2));
    }

    #[test]
    fn test_triple_clash_discards_leftover() {
        let mut market = Market::from_cards(&[Card::Red, Card::Blue, Card::Red, Card::Blue]);
        let mut rng = GameRng::new(5);

        let result = resolve_clash(&PlayerId::ALL, &mut market, &mut rng);

        assert_eq!(result.pool.len(), 4);
        let served: Vec<_> = result.awards.iter().map(|&(p, _)| p).collect();
        assert_eq!(served, PlayerId::ALL.to_vec());
        assert_eq!(result.discarded.len(), 1);
        assert!(market.is_empty());
    }

    #[test]
    fn test_clash_with_fewer_cards_than_players() {
        let mut market = Market::from_cards(&[Card::Blue]);
        let mut rng = GameRng::new(9);

        let result = resolve_clash(&PlayerId::ALL, &mut market, &mut rng);

        assert_eq!(result.awards, vec![(PlayerId::You, Card::Blue)]);
        assert!(result.discarded.is_empty());
        assert!(market.is_empty());
    }

    #[test]
    fn test_clash_deal_is_seeded() {
        let cards = [Card::Red, Card::Blue, Card::Blue];
        let deal = |seed| {
            let mut market = Market::from_cards(&cards);
            resolve_clash(&[PlayerId::CpuA, PlayerId::CpuB], &mut market, &mut GameRng::new(seed))
        };

        assert_eq!(deal(8), deal(8));
        let dealt = deal(8);
        let mut all: Vec<_> = dealt.awards.iter().map(|&(_, c)| c).chain(dealt.discarded).collect();
        all.sort();
        let mut expected = cards.to_vec();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_take_drafted_skips_missing() {
        let mut market = Market::from_cards(&[Card::Red, Card::Blue]);
        let taken = take_drafted(&mut market, &[Card::Blue, Card::Blue, Card::Red], 2);
        assert_eq!(taken, vec![Card::Blue, Card::Red]);
        assert!(market.is_empty());
    }
}
