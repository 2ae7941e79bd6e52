//! Property tests for turn order, allocation and whole games.

use equilibrium_market::core::{CardCounts, Chip, Difficulty, GameConfig, PlayerId};
use equilibrium_market::game::{EventLog, Game, GameEvent, NullObserver, Progress};
use equilibrium_market::rules::{Reveal, TurnOrder};
use proptest::prelude::*;

fn chip() -> impl Strategy<Value = Chip> {
    prop_oneof![Just(Chip::Gold), Just(Chip::Silver), Just(Chip::Bronze)]
}

fn unattended(seed: u64, tier: usize) -> GameConfig {
    let difficulty = Difficulty::ALL[tier];
    GameConfig::new()
        .with_seed(seed)
        .with_difficulty(PlayerId::CpuA, difficulty)
        .with_difficulty(PlayerId::CpuB, difficulty)
        .with_autopilot(difficulty)
}

fn reveals(chips: [Chip; 3]) -> Vec<Reveal> {
    PlayerId::ALL
        .into_iter()
        .zip(chips)
        .map(|(p, c)| Reveal::new(p, c))
        .collect()
}

proptest! {
    /// Test that clashed chips rank at 0 and unique chips keep their value.
    #[test]
    fn prop_turn_order_clash_values(chips in prop::array::uniform3(chip())) {
        let order = TurnOrder::resolve(&reveals(chips));
        let placements = order.placements();

        prop_assert_eq!(placements.len(), 3);
        for placement in placements {
            let same = chips.iter().filter(|&&c| c == placement.chip).count();
            prop_assert_eq!(placement.clashed, same > 1);
            let expected = if same > 1 { 0 } else { placement.chip.value() };
            prop_assert_eq!(placement.effective_value, expected);
        }
        for pair in placements.windows(2) {
            prop_assert!(pair[0].effective_value >= pair[1].effective_value);
        }
        for band in order.bands() {
            prop_assert_eq!(band.is_clash(), placements[band.position].clashed);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Test that any seeded unattended game finishes with every card accounted for.
    #[test]
    fn prop_full_game_conserves_cards(seed in any::<u64>(), tier in 0usize..3) {
        let mut game = Game::new(unattended(seed, tier));

        let Progress::Finished(standings) = game.advance(&mut NullObserver) else {
            return Err(TestCaseError::fail("unattended game stopped on a decision"));
        };

        prop_assert_eq!(standings.entries().len(), 3);
        for report in game.history() {
            let collected: u32 = report.cards.values().map(CardCounts::total).sum();
            prop_assert_eq!(collected as usize + report.discarded, report.dealt);
            prop_assert!(report.dealt <= 40);
        }
    }

    /// Test that every mini-round hands out at most four cards, discards the
    /// rest, and serves each clash group `min(group, pool)` cards.
    #[test]
    fn prop_allocation_conserves_market(seed in any::<u64>(), tier in 0usize..3) {
        let mut game = Game::new(unattended(seed, tier));
        let mut log = EventLog::new();
        let Progress::Finished(_) = game.advance(&mut log) else {
            return Err(TestCaseError::fail("unattended game stopped on a decision"));
        };
        let events: Vec<GameEvent> = log.events().iter().cloned().collect();

        let mut dealt: Option<usize> = None;
        let mut awarded = 0;
        let mut discarded = 0;
        let mut mini_rounds = 0;

        for (i, event) in events.iter().enumerate() {
            match event {
                GameEvent::MiniRoundStarted { market, .. } => {
                    dealt = Some(market.len());
                    awarded = 0;
                    discarded = 0;
                    mini_rounds += 1;
                }
                GameEvent::ClashDeclared { players, pool } => {
                    let Some(market) = dealt else {
                        return Err(TestCaseError::fail("clash outside a mini-round"));
                    };
                    // A clash takes everything still on the table.
                    prop_assert_eq!(pool.len() + awarded, market);

                    let awards: Vec<_> = events[i + 1..]
                        .iter()
                        .map_while(|e| match e {
                            GameEvent::CardsAwarded { player, cards, .. } => Some((*player, cards.len())),
                            _ => None,
                        })
                        .collect();
                    prop_assert_eq!(awards.len(), players.len().min(pool.len()));
                    for (player, count) in &awards {
                        prop_assert!(players.contains(player));
                        prop_assert_eq!(*count, 1);
                    }
                }
                GameEvent::CardsAwarded { cards, .. } => awarded += cards.len(),
                GameEvent::CardsDiscarded { cards } => discarded += cards.len(),
                GameEvent::BasicPointsScored { .. } | GameEvent::DeckExhausted { .. } => {
                    if let Some(market) = dealt.take() {
                        prop_assert_eq!(awarded + discarded, market);
                        prop_assert!(awarded <= 4);
                    }
                }
                _ => {}
            }

            // Close a mini-round when the next one begins.
            if let Some(GameEvent::MiniRoundStarted { .. }) = events.get(i + 1) {
                if let Some(market) = dealt.take() {
                    prop_assert_eq!(awarded + discarded, market);
                    prop_assert!(awarded <= 4);
                }
            }
        }

        let played: usize = game.history().iter().map(|r| r.mini_rounds as usize).sum();
        prop_assert_eq!(mini_rounds, played);
    }
}
