//! The round controller: five rounds of five mini-rounds each, then
//! final standings.
//!
//! ## Driving a game
//!
//! `Game` is a resumable state machine. `advance` runs every automatic step
//! (AI decisions included) until a human decision is needed or the game is
//! over. `submit` delivers one answer and keeps going. At most one decision
//! is pending at any time, and a rejected answer changes nothing.
//!
//! ```
//! use equilibrium_market::core::{Difficulty, GameConfig};
//! use equilibrium_market::game::{Game, NullObserver, Progress};
//!
//! let config = GameConfig::new().with_seed(3).with_autopilot(Difficulty::Easy);
//! let mut game = Game::new(config);
//!
//! match game.advance(&mut NullObserver) {
//!     Progress::Finished(standings) => assert_eq!(standings.entries().len(), 3),
//!     Progress::Awaiting(decision) => unreachable!("no human seat: {decision:?}"),
//! }
//! ```
//!
//! ## Mini-round
//!
//! 1. Deal up to four cards into the market.
//! 2. Collect one chip per seat. Human chips are awaited first; AI seats
//!    then choose from a snapshot of everyone's remaining chips.
//! 3. Reveal, rank, and run the allocation plan. A human draft is taken one
//!    card per submission.
//! 4. Discard whatever is left in the market.

use im::Vector;
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::ai::{self, ChipContext};
use crate::core::{
    Card, Chip, ChipView, Choice, Controller, Decision, GameConfig, GameError, GameRng, GameRngState, Market,
    PlayerId, PlayerMap, PlayerState, ResourceDeck, SeatView, Snapshot,
};
use crate::rules::market::{plan, resolve_clash, take_drafted, AllocationStep};
use crate::rules::scoring::{basic_points_for, sudden_death_deltas, ScoringCase};
use crate::rules::sudden_death::{Finalist, SessionEvent, SessionStatus, SuddenDeathOutcome, SuddenDeathSession};
use crate::rules::{Reveal, TurnOrder, MINI_ROUNDS, ROUNDS};

use super::event::{GameEvent, Observer};
use super::report::RoundReport;
use super::standings::Standings;
use super::Progress;

/// A human draft in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Draft {
    player: PlayerId,
    /// Picks still owed.
    remaining: usize,
}

#[derive(Clone, Debug)]
enum Stage {
    NotStarted,
    RoundStart,
    MiniRoundStart,
    CommitChips,
    Allocate {
        steps: SmallVec<[AllocationStep; 3]>,
        next: usize,
        draft: Option<Draft>,
    },
    MiniRoundEnd,
    Scoring,
    SuddenDeath {
        session: Box<SuddenDeathSession>,
        basic: PlayerMap<u32>,
        case: ScoringCase,
    },
    Finished(Standings),
}

/// One complete game.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    players: PlayerMap<PlayerState>,

    deck_rng: GameRng,
    /// Deck stream as it stood before this round's shuffle.
    round_deck: GameRngState,
    clash_rng: GameRng,
    coin_rng: GameRng,
    /// Private stream per AI seat.
    seat_rngs: PlayerMap<GameRng>,

    round: u8,
    mini_round: u8,
    mini_rounds_played: u8,
    ended_early: bool,
    deck: ResourceDeck,
    market: Market,
    dealt: usize,
    discarded: usize,
    /// Whether this mini-round's chips are face up.
    revealed: bool,

    stage: Stage,
    history: Vector<RoundReport>,
}

impl Game {
    /// Set up a game. Nothing happens until the first `advance`.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let root = GameRng::new(config.seed);
        let controllers = config.controllers();
        let deck_rng = root.for_context("deck");

        Self {
            players: PlayerMap::new(|p| PlayerState::new(p, controllers[p])),
            round_deck: deck_rng.state(),
            deck_rng,
            clash_rng: root.for_context("clash"),
            coin_rng: root.for_context("coin"),
            seat_rngs: PlayerMap::new(|p| root.for_context(p.name())),
            config,
            round: 0,
            mini_round: 0,
            mini_rounds_played: 0,
            ended_early: false,
            deck: ResourceDeck::empty(),
            market: Market::default(),
            dealt: 0,
            discarded: 0,
            revealed: false,
            stage: Stage::NotStarted,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    /// Current round, 1-based. 0 before the game starts.
    #[must_use]
    pub fn round(&self) -> u8 {
        self.round
    }

    #[must_use]
    pub fn mini_round(&self) -> u8 {
        self.mini_round
    }

    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    #[must_use]
    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Cards discarded so far this round.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Reports of every scored round, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RoundReport> {
        &self.history
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.stage, Stage::Finished(_))
    }

    /// Final standings once the game is over.
    #[must_use]
    pub fn standings(&self) -> Option<&Standings> {
        match &self.stage {
            Stage::Finished(standings) => Some(standings),
            _ => None,
        }
    }

    /// The running tie-break, if one is in progress.
    #[must_use]
    pub fn sudden_death(&self) -> Option<&SuddenDeathSession> {
        match &self.stage {
            Stage::SuddenDeath { session, .. } => Some(session.as_ref()),
            _ => None,
        }
    }

    /// Public view of the table.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            mini_round: self.mini_round,
            market: self.market.to_vec(),
            deck_remaining: self.deck.len(),
            seats: self.players.map(|_, p| SeatView {
                vp: p.vp,
                cards: p.cards,
                chips_remaining: p.chips.len(),
                revealed_chip: if self.revealed { p.played_chip } else { None },
            }),
        }
    }

    /// The decision the game is waiting on, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Decision> {
        match &self.stage {
            Stage::CommitChips => self
                .players
                .values()
                .find(|p| p.is_human() && p.played_chip.is_none())
                .map(|p| Decision::Chip {
                    player: p.id,
                    available: p.chips.kinds(),
                }),
            Stage::Allocate { draft: Some(draft), .. } => Some(Decision::DraftCard {
                player: draft.player,
                available: self.market.to_vec(),
                remaining: draft.remaining,
            }),
            Stage::SuddenDeath { session, .. } => session.pending(),
            _ => None,
        }
    }

    /// Run until a human decision is needed or the game ends.
    pub fn advance(&mut self, observer: &mut dyn Observer) -> Progress {
        loop {
            if let Stage::Finished(standings) = &self.stage {
                return Progress::Finished(standings.clone());
            }
            if let Some(decision) = self.pending() {
                return Progress::Awaiting(decision);
            }
            self.step(observer);
        }
    }

    /// Answer the pending decision and continue.
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the game unchanged when the game is over,
    /// nothing is pending, or the choice is not acceptable. Rejections are
    /// also announced to the observer as `SelectionRejected`.
    pub fn submit(&mut self, choice: Choice, observer: &mut dyn Observer) -> Result<Progress, GameError> {
        if self.is_finished() {
            return Err(GameError::GameFinished);
        }
        let decision = self.pending().ok_or(GameError::NoPendingDecision)?;

        if let Err(err) = self.apply(&decision, choice, observer) {
            if err.is_rejection() {
                debug!(player = %decision.player(), %err, "selection rejected");
                observer.notify(&GameEvent::SelectionRejected {
                    player: decision.player(),
                    reason: err.to_string(),
                });
            }
            return Err(err);
        }

        Ok(self.advance(observer))
    }

    /// Play to the end, answering every decision with `answer`.
    ///
    /// # Errors
    ///
    /// Stops at the first rejected answer.
    pub fn play_with(
        &mut self,
        observer: &mut dyn Observer,
        mut answer: impl FnMut(&Decision) -> Choice,
    ) -> Result<Standings, GameError> {
        let mut progress = self.advance(observer);
        loop {
            match progress {
                Progress::Finished(standings) => return Ok(standings),
                Progress::Awaiting(decision) => {
                    progress = self.submit(answer(&decision), observer)?;
                }
            }
        }
    }

    fn render(&self, observer: &mut dyn Observer) {
        observer.render_state(&self.snapshot());
    }

    // =========================================================================
    // Human input
    // =========================================================================

    fn apply(&mut self, decision: &Decision, choice: Choice, observer: &mut dyn Observer) -> Result<(), GameError> {
        if let Stage::SuddenDeath { session, .. } = &mut self.stage {
            let mut events = Vec::new();
            let result = session.submit(choice, &mut self.seat_rngs, &mut events);
            forward(events, observer);
            return result.map(|_| ());
        }

        if decision.expects() != choice.kind() {
            return Err(GameError::UnexpectedChoice {
                expected: decision.expects(),
                got: choice.kind(),
            });
        }

        let player = decision.player();
        match choice {
            Choice::Chip(chip) => {
                let state = &mut self.players[player];
                if state.chips.take(chip).is_none() {
                    return Err(GameError::invalid(player, format!("no {chip} chip left")));
                }
                state.played_chip = Some(chip);
                observer.notify(&GameEvent::ChipCommitted { player });
                Ok(())
            }
            Choice::Card(card) => {
                if self.market.take(card).is_none() {
                    return Err(GameError::invalid(player, format!("no {card} card in the market")));
                }
                self.players[player].cards.add(card);

                let remaining = match &mut self.stage {
                    Stage::Allocate { draft: Some(draft), .. } => {
                        draft.remaining -= 1;
                        draft.remaining
                    }
                    _ => 0,
                };
                observer.notify(&GameEvent::CardsAwarded {
                    player,
                    cards: vec![card],
                    remaining,
                });
                if remaining == 0 {
                    self.finish_allocation_step();
                }
                self.render(observer);
                Ok(())
            }
            Choice::Nominate(_) | Choice::Role(_) => Err(GameError::UnexpectedChoice {
                expected: decision.expects(),
                got: choice.kind(),
            }),
        }
    }

    // =========================================================================
    // Automatic steps
    // =========================================================================

    fn step(&mut self, observer: &mut dyn Observer) {
        match self.stage {
            Stage::NotStarted => {
                info!(seed = self.config.seed, cpu_a = %self.config.cpu_a, cpu_b = %self.config.cpu_b, "game started");
                observer.notify(&GameEvent::GameStarted {
                    config: self.config.clone(),
                });
                self.stage = Stage::RoundStart;
            }
            Stage::RoundStart => self.start_round(observer),
            Stage::MiniRoundStart => self.start_mini_round(observer),
            Stage::CommitChips => self.commit_ai_chips(observer),
            Stage::Allocate { .. } => self.allocate_next(observer),
            Stage::MiniRoundEnd => self.end_mini_round(observer),
            Stage::Scoring => self.score_round(observer),
            Stage::SuddenDeath { .. } => self.continue_sudden_death(observer),
            Stage::Finished(_) => {}
        }
    }

    fn start_round(&mut self, observer: &mut dyn Observer) {
        if self.round >= ROUNDS {
            self.finish(observer);
            return;
        }

        self.round += 1;
        self.mini_round = 0;
        self.mini_rounds_played = 0;
        self.ended_early = false;
        self.dealt = 0;
        self.discarded = 0;
        for (_, player) in self.players.iter_mut() {
            player.reset_round();
        }
        self.round_deck = self.deck_rng.state();
        self.deck = ResourceDeck::shuffled(&mut self.deck_rng);

        info!(round = self.round, "round started");
        observer.notify(&GameEvent::RoundStarted { round: self.round });
        self.render(observer);
        self.stage = Stage::MiniRoundStart;
    }

    fn start_mini_round(&mut self, observer: &mut dyn Observer) {
        if self.mini_round >= MINI_ROUNDS {
            self.stage = Stage::Scoring;
            return;
        }

        if self.deck.is_empty() && self.market.is_empty() {
            warn!(round = self.round, mini_round = self.mini_round, "deck exhausted, scoring early");
            self.ended_early = true;
            observer.notify(&GameEvent::DeckExhausted {
                round: self.round,
                mini_round: self.mini_round,
            });
            self.stage = Stage::Scoring;
            return;
        }

        self.mini_round += 1;
        self.revealed = false;
        for (_, player) in self.players.iter_mut() {
            player.played_chip = None;
        }
        self.market = Market::deal(&mut self.deck);
        self.dealt += self.market.len();

        debug!(round = self.round, mini_round = self.mini_round, market = ?self.market.cards(), "market dealt");
        observer.notify(&GameEvent::MiniRoundStarted {
            round: self.round,
            mini_round: self.mini_round,
            market: self.market.to_vec(),
            deck_remaining: self.deck.len(),
        });
        self.render(observer);
        self.stage = Stage::CommitChips;
    }

    /// Every human chip is in; AI seats choose now, then chips are revealed.
    fn commit_ai_chips(&mut self, observer: &mut dyn Observer) {
        let view = ChipView::capture(&self.players);
        let market = self.market.to_vec();

        for seat in PlayerId::ALL {
            let state = &self.players[seat];
            let Controller::Ai(difficulty) = state.controller else {
                continue;
            };
            if state.played_chip.is_some() {
                continue;
            }

            let hand = state.chips.clone();
            let ctx = ChipContext {
                player: seat,
                hand: &hand,
                cards: state.cards,
                market: &market,
                view: &view,
            };
            let chip = ai::play_chip(
                ai::strategy(difficulty),
                &ctx,
                &mut self.players[seat].chips,
                &mut self.seat_rngs[seat],
            );

            match chip {
                Some(chip) => {
                    self.players[seat].played_chip = Some(chip);
                    observer.notify(&GameEvent::ChipCommitted { player: seat });
                }
                None => warn!(player = %seat, "no chips left to commit"),
            }
        }

        self.reveal(observer);
    }

    fn reveal(&mut self, observer: &mut dyn Observer) {
        let reveals: Vec<Reveal> = self
            .players
            .values()
            .filter_map(|p| p.played_chip.map(|chip| Reveal::new(p.id, chip)))
            .collect();
        let order = TurnOrder::resolve(&reveals);
        self.revealed = true;

        debug!(reveals = ?reveals, order = %order, "chips revealed");
        observer.notify(&GameEvent::ChipsRevealed { reveals });
        observer.notify(&GameEvent::TurnOrderResolved { order: order.clone() });
        self.render(observer);

        self.stage = Stage::Allocate {
            steps: plan(&order),
            next: 0,
            draft: None,
        };
    }

    fn allocate_next(&mut self, observer: &mut dyn Observer) {
        let step = match &self.stage {
            Stage::Allocate { steps, next, .. } => steps.get(*next).cloned(),
            _ => return,
        };

        let Some(step) = step else {
            self.stage = Stage::MiniRoundEnd;
            return;
        };

        match step {
            AllocationStep::Clash { players } => {
                let result = resolve_clash(&players, &mut self.market, &mut self.clash_rng);
                observer.notify(&GameEvent::ClashDeclared {
                    players: players.to_vec(),
                    pool: result.pool.clone(),
                });

                for &(player, card) in &result.awards {
                    self.players[player].cards.add(card);
                    observer.notify(&GameEvent::CardsAwarded {
                        player,
                        cards: vec![card],
                        remaining: 0,
                    });
                }
                for &player in players.iter().skip(result.awards.len()) {
                    observer.notify(&GameEvent::DraftSkipped { player });
                }
                if !result.discarded.is_empty() {
                    self.discarded += result.discarded.len();
                    observer.notify(&GameEvent::CardsDiscarded {
                        cards: result.discarded,
                    });
                }
                self.render(observer);
                self.finish_allocation_step();
            }
            AllocationStep::Draft { player, quota } => {
                let count = quota.min(self.market.len());
                if count == 0 {
                    observer.notify(&GameEvent::DraftSkipped { player });
                    self.finish_allocation_step();
                    return;
                }

                match self.players[player].controller {
                    Controller::Human => {
                        if let Stage::Allocate { draft, .. } = &mut self.stage {
                            *draft = Some(Draft { player, remaining: count });
                        }
                    }
                    Controller::Ai(difficulty) => {
                        let available = self.market.to_vec();
                        let picks = (ai::strategy(difficulty).draft)(
                            &available,
                            count,
                            self.players[player].cards,
                            &mut self.seat_rngs[player],
                        );
                        let taken = take_drafted(&mut self.market, &picks, count);
                        if taken.len() < count {
                            warn!(player = %player, wanted = count, got = taken.len(), "draft policy returned too few cards");
                        }
                        for &card in &taken {
                            self.players[player].cards.add(card);
                        }
                        trace!(player = %player, cards = ?taken, "cards drafted");
                        observer.notify(&GameEvent::CardsAwarded {
                            player,
                            cards: taken,
                            remaining: 0,
                        });
                        self.render(observer);
                        self.finish_allocation_step();
                    }
                }
            }
        }
    }

    fn finish_allocation_step(&mut self) {
        if let Stage::Allocate { next, draft, .. } = &mut self.stage {
            *next += 1;
            *draft = None;
        }
    }

    fn end_mini_round(&mut self, observer: &mut dyn Observer) {
        let leftover = self.market.drain();
        if !leftover.is_empty() {
            self.discarded += leftover.len();
            observer.notify(&GameEvent::CardsDiscarded { cards: leftover });
        }
        self.mini_rounds_played += 1;
        self.render(observer);
        self.stage = Stage::MiniRoundStart;
    }

    fn score_round(&mut self, observer: &mut dyn Observer) {
        let cards = self.players.map(|_, p| p.cards);
        let basic = basic_points_for(&cards);
        observer.notify(&GameEvent::BasicPointsScored {
            cards: cards.clone(),
            basic: basic.clone(),
        });

        let case = ScoringCase::classify(&basic);
        info!(round = self.round, basic = ?basic, case = case.label(), "round scored");
        observer.notify(&GameEvent::ScoringCaseApplied { case });

        match case {
            ScoringCase::SuddenDeath { finalists, arbiter, .. } => {
                let [a, b] = finalists;
                let session = SuddenDeathSession::new(
                    [
                        Finalist::new(a, self.players[a].controller, cards[a]),
                        Finalist::new(b, self.players[b].controller, cards[b]),
                    ],
                    arbiter,
                    self.players[arbiter].controller,
                    self.coin_rng.fork(),
                );
                self.stage = Stage::SuddenDeath {
                    session: Box::new(session),
                    basic,
                    case,
                };
            }
            _ => {
                let deltas = case.direct_deltas().unwrap_or_else(|| PlayerMap::with_value(0));
                self.finish_round(basic, case, None, deltas, observer);
            }
        }
    }

    fn continue_sudden_death(&mut self, observer: &mut dyn Observer) {
        let Stage::SuddenDeath { session, basic, case } = &mut self.stage else {
            return;
        };

        let mut events = Vec::new();
        let status = session.advance(&mut self.seat_rngs, &mut events);
        forward(events, observer);

        let outcome = match status {
            SessionStatus::Resolved(outcome) => outcome,
            // A human answer is due; `pending` reports it.
            SessionStatus::Awaiting(_) => return,
        };
        let basic = basic.clone();
        let case = *case;

        let shared = match case {
            ScoringCase::SuddenDeath { basic: shared, .. } => shared,
            _ => 0,
        };
        let deltas = sudden_death_deltas(shared, outcome.winner, outcome.loser, outcome.winner_bonus);
        self.finish_round(basic, case, Some(outcome), deltas, observer);
    }

    fn finish_round(
        &mut self,
        basic: PlayerMap<u32>,
        case: ScoringCase,
        sudden_death: Option<SuddenDeathOutcome>,
        deltas: PlayerMap<u32>,
        observer: &mut dyn Observer,
    ) {
        for (id, player) in self.players.iter_mut() {
            player.vp += deltas[id];
        }

        let report = RoundReport {
            round: self.round,
            cards: self.players.map(|_, p| p.cards),
            basic,
            case,
            sudden_death,
            deltas,
            dealt: self.dealt,
            discarded: self.discarded,
            mini_rounds: self.mini_rounds_played,
            ended_early: self.ended_early,
            deck_rng: self.round_deck.clone(),
        };

        info!(round = self.round, deltas = ?report.deltas, "round finished");
        observer.notify(&GameEvent::RoundScored { report: report.clone() });
        self.history.push_back(report);
        self.render(observer);
        self.stage = Stage::RoundStart;
    }

    fn finish(&mut self, observer: &mut dyn Observer) {
        let vp = self.players.map(|_, p| p.vp);
        let standings = Standings::from_scores(&vp);

        info!(leaders = ?standings.leaders(), vp = ?vp, "game finished");
        observer.notify(&GameEvent::GameFinished {
            standings: standings.clone(),
        });
        self.stage = Stage::Finished(standings);
    }
}

/// Pass tie-break events on to the observer.
fn forward(events: Vec<SessionEvent>, observer: &mut dyn Observer) {
    for event in events {
        observer.notify(&GameEvent::from(event));
    }
}

/// Answer any decision with its first legal option.
///
/// Useful for driving the human seat in tests and demos.
#[must_use]
pub fn first_option(decision: &Decision) -> Choice {
    match decision {
        Decision::Chip { available, .. } => Choice::Chip(available.first().copied().unwrap_or(Chip::Bronze)),
        Decision::DraftCard { available, .. } => Choice::Card(available.first().copied().unwrap_or(Card::Red)),
        Decision::TrimHand { allowed, .. } => Choice::Card(allowed.first().copied().unwrap_or(Card::Red)),
        Decision::NominateSelector { candidates, .. } => Choice::Nominate(candidates[0]),
        Decision::ChooseRole { .. } => Choice::Role(crate::core::Role::Matcher),
        Decision::RevealCard { stock, .. } => Choice::Card(stock.available().first().copied().unwrap_or(Card::Red)),
    }
}
