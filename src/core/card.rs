//! Resource cards, per-player card counts, the round deck and the market.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rng::GameRng;

/// A resource card. Only its colour matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    Red,
    Blue,
}

impl Card {
    pub const ALL: [Card; 2] = [Card::Red, Card::Blue];

    /// The other colour.
    #[must_use]
    pub const fn opposite(self) -> Card {
        match self {
            Card::Red => Card::Blue,
            Card::Blue => Card::Red,
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Card::Red => "red",
            Card::Blue => "blue",
        })
    }
}

/// Count how many cards of one colour a slice holds.
#[must_use]
pub fn count_of(cards: &[Card], card: Card) -> usize {
    cards.iter().filter(|&&c| c == card).count()
}

/// Remove the first card of the given colour from a pool.
pub fn remove_card(pool: &mut Vec<Card>, card: Card) -> Option<Card> {
    let index = pool.iter().position(|&c| c == card)?;
    Some(pool.remove(index))
}

/// Red/blue tallies.
///
/// Used for a player's collected cards within a round, and for stocks
/// during the sudden-death mini-game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardCounts {
    pub red: u32,
    pub blue: u32,
}

impl CardCounts {
    #[must_use]
    pub const fn new(red: u32, blue: u32) -> Self {
        Self { red, blue }
    }

    /// Tally a slice of cards.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        cards.iter().fold(Self::default(), |mut counts, &card| {
            counts.add(card);
            counts
        })
    }

    #[must_use]
    pub const fn get(&self, card: Card) -> u32 {
        match card {
            Card::Red => self.red,
            Card::Blue => self.blue,
        }
    }

    pub fn add(&mut self, card: Card) {
        match card {
            Card::Red => self.red += 1,
            Card::Blue => self.blue += 1,
        }
    }

    /// Decrement one colour. Returns `false` if that colour is already zero.
    pub fn remove(&mut self, card: Card) -> bool {
        let slot = match card {
            Card::Red => &mut self.red,
            Card::Blue => &mut self.blue,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.red + self.blue
    }

    /// Signed difference `red - blue`.
    #[must_use]
    pub fn difference(&self) -> i64 {
        i64::from(self.red) - i64::from(self.blue)
    }

    /// Absolute difference `|red - blue|`.
    #[must_use]
    pub const fn abs_difference(&self) -> u32 {
        self.red.abs_diff(self.blue)
    }

    /// Colours still available (non-zero), red first.
    #[must_use]
    pub fn available(&self) -> Vec<Card> {
        Card::ALL.into_iter().filter(|&c| self.get(c) > 0).collect()
    }

    /// Expand into a hand: all reds followed by all blues.
    #[must_use]
    pub fn to_hand(&self) -> Vec<Card> {
        let mut hand = Vec::with_capacity(self.total() as usize);
        hand.extend(std::iter::repeat(Card::Red).take(self.red as usize));
        hand.extend(std::iter::repeat(Card::Blue).take(self.blue as usize));
        hand
    }
}

impl std::fmt::Display for CardCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}R/{}B", self.red, self.blue)
    }
}

/// The shuffled resource deck for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeck {
    cards: Vec<Card>,
}

impl ResourceDeck {
    /// Cards of each colour in a fresh deck.
    pub const CARDS_PER_COLOUR: usize = 20;

    /// Total cards in a fresh deck.
    pub const SIZE: usize = Self::CARDS_PER_COLOUR * 2;

    /// Build a fresh 20 red / 20 blue deck and shuffle it.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for _ in 0..Self::CARDS_PER_COLOUR {
            cards.push(Card::Red);
            cards.push(Card::Blue);
        }
        rng.shuffle(&mut cards);
        Self { cards }
    }

    /// A deck with an explicit card order; the last card is drawn first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// An empty deck.
    #[must_use]
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Draw from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The face-up market of one mini-round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    cards: SmallVec<[Card; 4]>,
}

impl Market {
    /// Cards dealt into the market at each mini-round start.
    pub const SIZE: usize = 4;

    /// Deal up to `Market::SIZE` cards from the deck.
    pub fn deal(deck: &mut ResourceDeck) -> Self {
        let cards = std::iter::from_fn(|| deck.draw()).take(Self::SIZE).collect();
        Self { cards }
    }

    /// A market with explicit contents.
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: SmallVec::from_slice(cards),
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Copy of the current contents for policies and prompts.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Remove one card of the given colour.
    pub fn take(&mut self, card: Card) -> Option<Card> {
        let index = self.cards.iter().position(|&c| c == card)?;
        Some(self.cards.remove(index))
    }

    /// Remove and return everything left.
    pub fn drain(&mut self) -> Vec<Card> {
        self.cards.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_difference() {
        let counts = CardCounts::new(3, 7);
        assert_eq!(counts.difference(), -4);
        assert_eq!(counts.abs_difference(), 4);
        assert_eq!(counts.total(), 10);
    }

    #[test]
    fn test_counts_remove_stops_at_zero() {
        let mut counts = CardCounts::new(1, 0);
        assert!(counts.remove(Card::Red));
        assert!(!counts.remove(Card::Red));
        assert!(!counts.remove(Card::Blue));
        assert_eq!(counts, CardCounts::default());
    }

    #[test]
    fn test_counts_hand_expansion() {
        let counts = CardCounts::new(2, 1);
        let hand = counts.to_hand();
        assert_eq!(hand, vec![Card::Red, Card::Red, Card::Blue]);
        assert_eq!(CardCounts::from_cards(&hand), counts);
    }

    #[test]
    fn test_fresh_deck_composition() {
        let mut rng = GameRng::new(1);
        let deck = ResourceDeck::shuffled(&mut rng);
        assert_eq!(deck.len(), ResourceDeck::SIZE);
        assert_eq!(count_of(&deck.cards, Card::Red), 20);
        assert_eq!(count_of(&deck.cards, Card::Blue), 20);
    }

    #[test]
    fn test_market_deal_caps_at_deck_size() {
        let mut deck = ResourceDeck::from_cards(vec![Card::Red, Card::Blue]);
        let market = Market::deal(&mut deck);
        assert_eq!(market.cards(), &[Card::Blue, Card::Red]);
        assert!(deck.is_empty());

        let market = Market::deal(&mut deck);
        assert!(market.is_empty());
    }

    #[test]
    fn test_market_take_and_drain() {
        let mut market = Market::from_cards(&[Card::Red, Card::Blue, Card::Red]);
        assert_eq!(market.take(Card::Blue), Some(Card::Blue));
        assert_eq!(market.take(Card::Blue), None);
        assert_eq!(market.drain(), vec![Card::Red, Card::Red]);
        assert!(market.is_empty());
    }

    #[test]
    fn test_remove_card_first_occurrence() {
        let mut pool = vec![Card::Blue, Card::Red, Card::Red];
        assert_eq!(remove_card(&mut pool, Card::Red), Some(Card::Red));
        assert_eq!(pool, vec![Card::Blue, Card::Red]);
    }
}
