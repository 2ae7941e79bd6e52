//! Decision functions for the computer opponents.
//!
//! Every function works on copies of what it is shown and returns a
//! choice; nothing here mutates game state. The one exception is
//! `play_chip`, which removes the chosen chip from the AI's own hand.

use tracing::{trace, warn};

use crate::core::card::remove_card;
use crate::core::{count_of, Card, CardCounts, Chip, ChipHand, ChipView, GameRng, PlayerId, Role};

use super::Strategy;

/// What a chip policy may look at.
#[derive(Clone, Copy, Debug)]
pub struct ChipContext<'a> {
    pub player: PlayerId,
    /// The AI's own remaining chips.
    pub hand: &'a ChipHand,
    /// The AI's cards collected this round.
    pub cards: CardCounts,
    /// Face-up market of this mini-round.
    pub market: &'a [Card],
    /// Remaining chips of every seat, captured before any AI chose.
    pub view: &'a ChipView,
}

/// The colour that moves `red - blue` toward zero. Random when balanced.
pub fn desired_card(cards: CardCounts, rng: &mut GameRng) -> Card {
    match cards.difference() {
        d if d > 0 => Card::Blue,
        d if d < 0 => Card::Red,
        _ => {
            if rng.coin_flip() {
                Card::Red
            } else {
                Card::Blue
            }
        }
    }
}

// =============================================================================
// Chips
// =============================================================================

/// Uniformly random chip.
pub fn chip_easy(ctx: &ChipContext<'_>, rng: &mut GameRng) -> Option<Chip> {
    rng.choose(ctx.hand.chips()).copied()
}

/// Spend silver when the market offers the wanted colour, bronze otherwise,
/// and hold gold back until it is the only chip left.
pub fn chip_medium(ctx: &ChipContext<'_>, rng: &mut GameRng) -> Option<Chip> {
    let desired = desired_card(ctx.cards, rng);
    medium_for(ctx, desired)
}

fn medium_for(ctx: &ChipContext<'_>, desired: Card) -> Option<Chip> {
    let hand = ctx.hand;
    let has_silver = hand.contains(Chip::Silver);
    let has_bronze = hand.contains(Chip::Bronze);

    if !has_silver && !has_bronze {
        return hand.contains(Chip::Gold).then_some(Chip::Gold);
    }

    let chip = if ctx.market.contains(&desired) {
        if has_silver {
            Chip::Silver
        } else {
            Chip::Bronze
        }
    } else if has_bronze {
        Chip::Bronze
    } else {
        Chip::Silver
    };
    Some(chip)
}

/// Medium play, except that gold is spent on a market holding two or more
/// of the wanted colour when no other seat can still contest it with gold.
pub fn chip_hard(ctx: &ChipContext<'_>, rng: &mut GameRng) -> Option<Chip> {
    let desired = desired_card(ctx.cards, rng);

    if count_of(ctx.market, desired) >= 2
        && ctx.hand.contains(Chip::Gold)
        && !ctx.view.others_hold(ctx.player, Chip::Gold)
    {
        return Some(Chip::Gold);
    }

    medium_for(ctx, desired)
}

/// Ask a strategy for a chip and remove it from the hand.
///
/// If the preferred chip is not held, a uniformly random held chip is played
/// instead. `None` only when the hand is empty.
pub fn play_chip(
    strategy: &Strategy,
    ctx: &ChipContext<'_>,
    hand: &mut ChipHand,
    rng: &mut GameRng,
) -> Option<Chip> {
    let preferred = (strategy.chip)(ctx, rng);

    if let Some(chip) = preferred.and_then(|c| hand.take(c)) {
        trace!(player = %ctx.player, %chip, market = ?ctx.market, "chip chosen");
        return Some(chip);
    }

    warn!(player = %ctx.player, ?preferred, "preferred chip unavailable, playing a random chip");
    let index = match hand.len() {
        0 => return None,
        n => rng.gen_range_usize(0..n),
    };
    hand.take_at(index)
}

// =============================================================================
// Drafting
// =============================================================================

/// Take `count` cards uniformly at random, without replacement.
pub fn draft_easy(available: &[Card], count: usize, _cards: CardCounts, rng: &mut GameRng) -> Vec<Card> {
    let mut pool = available.to_vec();
    let mut picks = Vec::with_capacity(count);
    while picks.len() < count && !pool.is_empty() {
        let index = rng.gen_range_usize(0..pool.len());
        picks.push(pool.remove(index));
    }
    picks
}

/// Take the colour that rebalances the collection first.
pub fn draft_balancing(available: &[Card], count: usize, cards: CardCounts, rng: &mut GameRng) -> Vec<Card> {
    let desired = desired_card(cards, rng);
    take_preferring(available, count, desired)
}

/// Take up to `count` cards of `desired`, then the opposite colour, then
/// whatever is at the end of the pool.
#[must_use]
pub fn take_preferring(available: &[Card], count: usize, desired: Card) -> Vec<Card> {
    let mut pool = available.to_vec();
    let mut picks = Vec::with_capacity(count);

    while picks.len() < count {
        match remove_card(&mut pool, desired) {
            Some(card) => picks.push(card),
            None => break,
        }
    }

    while picks.len() < count {
        let next = remove_card(&mut pool, desired.opposite()).or_else(|| pool.pop());
        match next {
            Some(card) => picks.push(card),
            None => break,
        }
    }

    picks
}

// =============================================================================
// Sudden death
// =============================================================================

/// Keep `keep` cards drawn uniformly at random from the hand.
///
/// Any subset of the hand satisfies the colour minimums, so no check is needed.
pub fn trim_random(hand: CardCounts, keep: u32, rng: &mut GameRng) -> CardCounts {
    let kept = draft_easy(&hand.to_hand(), keep as usize, hand, rng);
    CardCounts::from_cards(&kept)
}

/// Keep `keep` cards, favouring the colour the hand holds fewer of.
///
/// The minority colour is red when red < blue, blue otherwise.
pub fn trim_minority(hand: CardCounts, keep: u32, _rng: &mut GameRng) -> CardCounts {
    let desired = if hand.red < hand.blue { Card::Red } else { Card::Blue };
    let kept = take_preferring(&hand.to_hand(), keep as usize, desired);
    CardCounts::from_cards(&kept)
}

/// Matcher or mismatcher with equal probability.
pub fn role_random(_hand: CardCounts, rng: &mut GameRng) -> Role {
    if rng.coin_flip() {
        Role::Matcher
    } else {
        Role::Mismatcher
    }
}

/// Mismatcher when the hand leans more than 20% toward one colour.
pub fn role_by_skew(hand: CardCounts, rng: &mut GameRng) -> Role {
    if hand.total() == 0 {
        return role_random(hand, rng);
    }
    // |r - b| > 0.2 * n, kept in integers.
    if 5 * hand.abs_difference() > hand.total() {
        Role::Mismatcher
    } else {
        Role::Matcher
    }
}

/// An AI arbiter nominates either finalist at random.
pub fn nominate_random(candidates: [PlayerId; 2], rng: &mut GameRng) -> PlayerId {
    candidates[rng.gen_range_usize(0..2)]
}

/// Reveal a uniformly random card from the hand.
pub fn reveal_random(hand: CardCounts, rng: &mut GameRng) -> Option<Card> {
    rng.choose(&hand.to_hand()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{strategy, MEDIUM};
    use crate::core::{Controller, Difficulty, PlayerMap, PlayerState};

    fn view_with(f: impl Fn(PlayerId, &mut ChipHand)) -> ChipView {
        let mut players = PlayerMap::new(|p| PlayerState::new(p, Controller::Ai(Difficulty::Hard)));
        for (id, player) in players.iter_mut() {
            f(id, &mut player.chips);
        }
        ChipView::capture(&players)
    }

    fn ctx<'a>(hand: &'a ChipHand, cards: CardCounts, market: &'a [Card], view: &'a ChipView) -> ChipContext<'a> {
        ChipContext {
            player: PlayerId::CpuA,
            hand,
            cards,
            market,
            view,
        }
    }

    #[test]
    fn test_desired_card_rebalances() {
        let mut rng = GameRng::new(1);
        assert_eq!(desired_card(CardCounts::new(3, 1), &mut rng), Card::Blue);
        assert_eq!(desired_card(CardCounts::new(0, 2), &mut rng), Card::Red);
    }

    #[test]
    fn test_medium_plays_silver_when_market_offers_desired() {
        let hand = ChipHand::full();
        let view = view_with(|_, _| {});
        let market = [Card::Blue, Card::Red];
        let mut rng = GameRng::new(1);

        let chip = chip_medium(&ctx(&hand, CardCounts::new(2, 0), &market, &view), &mut rng);
        assert_eq!(chip, Some(Chip::Silver));
    }

    #[test]
    fn test_medium_plays_bronze_without_desired() {
        let hand = ChipHand::full();
        let view = view_with(|_, _| {});
        let market = [Card::Red, Card::Red];
        let mut rng = GameRng::new(1);

        let chip = chip_medium(&ctx(&hand, CardCounts::new(2, 0), &market, &view), &mut rng);
        assert_eq!(chip, Some(Chip::Bronze));
    }

    #[test]
    fn test_medium_saves_gold_until_last() {
        let mut hand = ChipHand::full();
        hand.take(Chip::Silver);
        hand.take(Chip::Silver);
        hand.take(Chip::Bronze);
        let view = view_with(|_, _| {});
        let market = [Card::Red];
        let mut rng = GameRng::new(1);

        let chip = chip_medium(&ctx(&hand, CardCounts::new(0, 1), &market, &view), &mut rng);
        assert_eq!(chip, Some(Chip::Bronze));

        hand.take(Chip::Bronze);
        let chip = chip_medium(&ctx(&hand, CardCounts::new(0, 1), &market, &view), &mut rng);
        assert_eq!(chip, Some(Chip::Gold));
    }

    #[test]
    fn test_hard_spends_gold_when_uncontested() {
        let hand = ChipHand::full();
        let market = [Card::Blue, Card::Blue, Card::Red];
        let mut rng = GameRng::new(1);

        let contested = view_with(|_, _| {});
        let chip = chip_hard(&ctx(&hand, CardCounts::new(2, 0), &market, &contested), &mut rng);
        assert_eq!(chip, Some(Chip::Silver));

        let uncontested = view_with(|id, chips| {
            if id != PlayerId::CpuA {
                chips.take(Chip::Gold);
            }
        });
        let chip = chip_hard(&ctx(&hand, CardCounts::new(2, 0), &market, &uncontested), &mut rng);
        assert_eq!(chip, Some(Chip::Gold));
    }

    #[test]
    fn test_play_chip_removes_from_hand() {
        let mut hand = ChipHand::full();
        let snapshot = hand.clone();
        let view = view_with(|_, _| {});
        let market = [Card::Red];
        let mut rng = GameRng::new(3);

        let chip = play_chip(
            &MEDIUM,
            &ctx(&snapshot, CardCounts::new(1, 0), &market, &view),
            &mut hand,
            &mut rng,
        );

        assert_eq!(chip, Some(Chip::Bronze));
        assert_eq!(hand.len(), 4);
        assert_eq!(hand.count(Chip::Bronze), 1);
    }

    #[test]
    fn test_play_chip_falls_back_when_preferred_missing() {
        // The policy sees a full hand but only gold is really held.
        let claimed = ChipHand::full();
        let mut hand = ChipHand::full();
        for chip in [Chip::Silver, Chip::Silver, Chip::Bronze, Chip::Bronze] {
            hand.take(chip);
        }
        let view = view_with(|_, _| {});
        let market = [Card::Red];
        let mut rng = GameRng::new(3);

        let chip = play_chip(
            &MEDIUM,
            &ctx(&claimed, CardCounts::new(0, 1), &market, &view),
            &mut hand,
            &mut rng,
        );

        assert_eq!(chip, Some(Chip::Gold));
        assert!(hand.is_empty());
        assert_eq!(play_chip(&MEDIUM, &ctx(&claimed, CardCounts::new(0, 1), &market, &view), &mut hand, &mut rng), None);
    }

    #[test]
    fn test_easy_draft_without_replacement() {
        let available = [Card::Red, Card::Blue, Card::Red];
        let mut rng = GameRng::new(11);
        let picks = draft_easy(&available, 2, CardCounts::default(), &mut rng);

        assert_eq!(picks.len(), 2);
        assert!(count_of(&picks, Card::Red) <= 2);
        assert!(count_of(&picks, Card::Blue) <= 1);
    }

    #[test]
    fn test_take_preferring_fills_with_opposite() {
        let available = [Card::Red, Card::Blue, Card::Red];
        assert_eq!(take_preferring(&available, 2, Card::Blue), vec![Card::Blue, Card::Red]);
        assert_eq!(take_preferring(&available, 2, Card::Red), vec![Card::Red, Card::Red]);
        assert_eq!(take_preferring(&available, 5, Card::Blue).len(), 3);
    }

    #[test]
    fn test_trim_minority() {
        let mut rng = GameRng::new(1);
        // Minority is blue: keep both blues, fill with red.
        assert_eq!(trim_minority(CardCounts::new(4, 2), 3, &mut rng), CardCounts::new(1, 2));
        // Minority is red: it runs out after one.
        assert_eq!(trim_minority(CardCounts::new(1, 5), 3, &mut rng), CardCounts::new(1, 2));
        // Balanced hands count blue as the minority.
        assert_eq!(trim_minority(CardCounts::new(2, 2), 1, &mut rng), CardCounts::new(0, 1));
    }

    #[test]
    fn test_easy_trim_is_random() {
        let easy = strategy(Difficulty::Easy);
        let mut rng = GameRng::new(9);
        let hand = CardCounts::new(4, 4);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let kept = (easy.trim)(hand, 3, &mut rng);
            assert_eq!(kept.total(), 3);
            assert!(kept.red <= hand.red && kept.blue <= hand.blue);
            seen.insert((kept.red, kept.blue));
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_role_by_skew() {
        let mut rng = GameRng::new(1);
        assert_eq!(role_by_skew(CardCounts::new(4, 1), &mut rng), Role::Mismatcher);
        assert_eq!(role_by_skew(CardCounts::new(3, 2), &mut rng), Role::Matcher);
        // 6:4 sits exactly on the threshold.
        assert_eq!(role_by_skew(CardCounts::new(6, 4), &mut rng), Role::Matcher);
    }

    #[test]
    fn test_reveal_random_from_hand() {
        let mut rng = GameRng::new(2);
        assert_eq!(reveal_random(CardCounts::new(0, 3), &mut rng), Some(Card::Blue));
        assert_eq!(reveal_random(CardCounts::default(), &mut rng), None);
    }

    #[test]
    fn test_strategy_table() {
        let hard = strategy(Difficulty::Hard);
        let mut rng = GameRng::new(4);
        assert_eq!((hard.role)(CardCounts::new(5, 0), &mut rng), Role::Mismatcher);
        assert_eq!((hard.trim)(CardCounts::new(3, 1), 2, &mut rng), CardCounts::new(1, 1));
    }
}
