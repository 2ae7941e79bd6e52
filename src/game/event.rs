//! Events pushed to presenters, and the observer that receives them.
//!
//! Events are one-way: the engine never waits on an observer, and an
//! observer cannot influence the game. Chip commits are announced without
//! the chip; chips only become visible in `ChipsRevealed`.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Card, CardCounts, Chip, GameConfig, PlayerId, PlayerMap, Snapshot};
use crate::rules::{Reveal, ScoringCase, SessionEvent, SuddenDeathOutcome, TurnOrder};

use super::report::RoundReport;
use super::standings::Standings;

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        config: GameConfig,
    },
    RoundStarted {
        round: u8,
    },
    MiniRoundStarted {
        round: u8,
        mini_round: u8,
        market: Vec<Card>,
        deck_remaining: usize,
    },
    /// Deck and market are both empty; the round goes straight to scoring.
    DeckExhausted {
        round: u8,
        mini_round: u8,
    },
    /// A seat has committed a chip. The chip stays hidden.
    ChipCommitted {
        player: PlayerId,
    },
    ChipsRevealed {
        reveals: Vec<Reveal>,
    },
    TurnOrderResolved {
        order: TurnOrder,
    },
    ClashDeclared {
        players: Vec<PlayerId>,
        pool: Vec<Card>,
    },
    /// Cards credited to a player. During a human draft this is sent after
    /// every pick with the number of picks still owed.
    CardsAwarded {
        player: PlayerId,
        cards: Vec<Card>,
        remaining: usize,
    },
    /// A player's turn came with nothing left in the market.
    DraftSkipped {
        player: PlayerId,
    },
    CardsDiscarded {
        cards: Vec<Card>,
    },
    SelectionRejected {
        player: PlayerId,
        reason: String,
    },
    BasicPointsScored {
        cards: PlayerMap<CardCounts>,
        basic: PlayerMap<u32>,
    },
    ScoringCaseApplied {
        case: ScoringCase,
    },
    SuddenDeathStarted {
        finalists: [PlayerId; 2],
        arbiter: PlayerId,
        hands: [CardCounts; 2],
        match_rounds: u32,
    },
    /// One card kept during a human trim.
    CardKept {
        player: PlayerId,
        card: Card,
        kept: CardCounts,
        remaining: u32,
    },
    HandTrimmed {
        player: PlayerId,
        from: CardCounts,
        kept: CardCounts,
    },
    SelectorNominated {
        arbiter: PlayerId,
        selector: PlayerId,
    },
    RoleChosen {
        chosen_by: PlayerId,
        matcher: PlayerId,
        mismatcher: PlayerId,
    },
    MatchRevealed {
        round: u32,
        of: u32,
        matcher_card: Card,
        mismatcher_card: Card,
        matched: bool,
        matcher_tally: u32,
        mismatcher_tally: u32,
    },
    SuddenDeathResolved {
        outcome: SuddenDeathOutcome,
    },
    RoundScored {
        report: RoundReport,
    },
    GameFinished {
        standings: Standings,
    },
}

impl GameEvent {
    /// The chip a seat revealed, if this is a reveal event.
    #[must_use]
    pub fn revealed_chip(&self, player: PlayerId) -> Option<Chip> {
        match self {
            GameEvent::ChipsRevealed { reveals } => reveals.iter().find(|r| r.player == player).map(|r| r.chip),
            _ => None,
        }
    }
}

impl From<SessionEvent> for GameEvent {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::Started {
                finalists,
                arbiter,
                hands,
                match_rounds,
            } => GameEvent::SuddenDeathStarted {
                finalists,
                arbiter,
                hands,
                match_rounds,
            },
            SessionEvent::CardKept {
                player,
                card,
                kept,
                remaining,
            } => GameEvent::CardKept {
                player,
                card,
                kept,
                remaining,
            },
            SessionEvent::HandTrimmed { player, from, kept } => GameEvent::HandTrimmed { player, from, kept },
            SessionEvent::SelectorNominated { arbiter, selector } => GameEvent::SelectorNominated { arbiter, selector },
            SessionEvent::RoleChosen {
                chosen_by,
                matcher,
                mismatcher,
            } => GameEvent::RoleChosen {
                chosen_by,
                matcher,
                mismatcher,
            },
            SessionEvent::MatchRevealed {
                round,
                of,
                matcher_card,
                mismatcher_card,
                matched,
                matcher_tally,
                mismatcher_tally,
            } => GameEvent::MatchRevealed {
                round,
                of,
                matcher_card,
                mismatcher_card,
                matched,
                matcher_tally,
                mismatcher_tally,
            },
            SessionEvent::Resolved { outcome } => GameEvent::SuddenDeathResolved { outcome },
        }
    }
}

/// Receives events and state pushes from a running game.
pub trait Observer {
    fn notify(&mut self, event: &GameEvent);

    /// Called with a fresh snapshot whenever visible state changes.
    fn render_state(&mut self, _snapshot: &Snapshot) {}
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Records every event and keeps the latest snapshot.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vector<GameEvent>,
    latest: Option<Snapshot>,
    renders: usize,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &Vector<GameEvent> {
        &self.events
    }

    /// The most recent snapshot pushed, if any.
    #[must_use]
    pub fn latest_snapshot(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Number of snapshots pushed.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Forget every event and snapshot recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
        self.latest = None;
        self.renders = 0;
    }
}

impl Observer for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.push_back(event.clone());
    }

    fn render_state(&mut self, snapshot: &Snapshot) {
        self.latest = Some(snapshot.clone());
        self.renders += 1;
    }
}
