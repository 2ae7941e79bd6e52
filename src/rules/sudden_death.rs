//! The sudden-death tie-break.
//!
//! Two finalists tied on basic points play a short colour-matching game,
//! refereed by the third player (the arbiter).
//!
//! ## Flow
//!
//! 1. **Hand adjustment.** Each finalist's round-end cards become a
//!    temporary hand. The number of match rounds `m` is the smaller hand
//!    size, and the finalist with the larger hand keeps exactly `m` cards.
//!    With `m == 0` everything else is skipped and a coin decides.
//! 2. **Role selection.** The finalist whose hand was originally smaller
//!    chooses matcher or mismatcher. With equal hands the arbiter first
//!    nominates who chooses. The other finalist takes the opposite role.
//! 3. **Match loop.** `m` times, both finalists reveal one card. Equal
//!    colours score for the matcher, different colours for the mismatcher.
//! 4. **Resolution.** Higher tally wins and its tally is the winner's bonus.
//!    Equal tallies are settled by an unweighted coin flip.
//!
//! ## Trimming
//!
//! A human trims one card at a time. A card may be kept only if the hand
//! can still be completed afterwards: the kept hand must end with at least
//! `m - initial_blue` reds and `m - initial_red` blues (floored at zero), and
//! enough cards must remain in stock to fill the remaining slots.
//!
//! The session is a resumable state machine. `advance` runs until a human
//! must answer or the session resolves; `submit` applies one answer.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::ai;
use crate::core::{Card, CardCounts, Choice, Controller, Decision, GameError, GameRng, PlayerId, PlayerMap, Role};

// =============================================================================
// Trim feasibility
// =============================================================================

/// Fewest reds and blues a trimmed hand of `keep` cards must contain.
#[must_use]
pub fn trim_minimums(initial: CardCounts, keep: u32) -> CardCounts {
    CardCounts::new(keep.saturating_sub(initial.blue), keep.saturating_sub(initial.red))
}

/// Whether keeping `card` still leaves a completable hand.
///
/// `stock` is what has not been kept yet and `kept` is what has.
#[must_use]
pub fn can_keep(card: Card, initial: CardCounts, stock: CardCounts, kept: CardCounts, keep: u32) -> bool {
    let mut stock = stock;
    let mut kept = kept;
    if !stock.remove(card) {
        return false;
    }
    kept.add(card);
    if kept.total() > keep {
        return false;
    }

    let remaining = keep - kept.total();
    let minimums = trim_minimums(initial, keep);
    let need_red = minimums.red.saturating_sub(kept.red);
    let need_blue = minimums.blue.saturating_sub(kept.blue);

    need_red <= stock.red && need_blue <= stock.blue && need_red + need_blue <= remaining && remaining <= stock.total()
}

/// Colours that may be kept next, red first.
#[must_use]
pub fn allowed_keeps(initial: CardCounts, stock: CardCounts, kept: CardCounts, keep: u32) -> Vec<Card> {
    Card::ALL
        .into_iter()
        .filter(|&card| can_keep(card, initial, stock, kept, keep))
        .collect()
}

// =============================================================================
// Session types
// =============================================================================

/// One of the two tied players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalist {
    pub id: PlayerId,
    pub controller: Controller,
    /// Round-end cards, before trimming.
    pub initial: CardCounts,
    /// Current hand. Shrinks during trimming and the match loop.
    pub hand: CardCounts,
}

impl Finalist {
    #[must_use]
    pub fn new(id: PlayerId, controller: Controller, cards: CardCounts) -> Self {
        Self {
            id,
            controller,
            initial: cards,
            hand: cards,
        }
    }
}

/// Result of a finished tie-break.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuddenDeathOutcome {
    pub winner: PlayerId,
    pub loser: PlayerId,
    /// Added on top of the shared basic points for the winner.
    pub winner_bonus: u32,
    pub match_rounds: u32,
    /// `None` when no match was played.
    pub matcher: Option<PlayerId>,
    pub matcher_tally: u32,
    pub mismatcher_tally: u32,
    pub decided_by_coin: bool,
}

/// Something that happened during a tie-break.
///
/// Sessions append these to the buffer passed to `advance` and `submit`;
/// whoever drives the session decides where they go.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
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
    Resolved {
        outcome: SuddenDeathOutcome,
    },
}

/// Where a session stands after `advance`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Awaiting(Decision),
    Resolved(SuddenDeathOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    Start,
    Trim { index: usize, kept: CardCounts },
    Nominate,
    ChooseRole { selector: usize },
    Match { round: u32, matcher_card: Option<Card> },
    Resolve,
    Resolved(SuddenDeathOutcome),
}

/// A running tie-break.
#[derive(Clone, Debug)]
pub struct SuddenDeathSession {
    finalists: [Finalist; 2],
    arbiter: PlayerId,
    arbiter_controller: Controller,
    match_rounds: u32,
    /// Index into `finalists` of the matcher, once roles are set.
    matcher: Option<usize>,
    matcher_tally: u32,
    mismatcher_tally: u32,
    coin: GameRng,
    stage: Stage,
}

impl SuddenDeathSession {
    /// Set up a tie-break. `coin` should be a fresh fork for this session.
    #[must_use]
    pub fn new(finalists: [Finalist; 2], arbiter: PlayerId, arbiter_controller: Controller, coin: GameRng) -> Self {
        let match_rounds = finalists[0].initial.total().min(finalists[1].initial.total());
        Self {
            finalists,
            arbiter,
            arbiter_controller,
            match_rounds,
            matcher: None,
            matcher_tally: 0,
            mismatcher_tally: 0,
            coin,
            stage: Stage::Start,
        }
    }

    #[must_use]
    pub fn finalists(&self) -> &[Finalist; 2] {
        &self.finalists
    }

    #[must_use]
    pub fn arbiter(&self) -> PlayerId {
        self.arbiter
    }

    #[must_use]
    pub fn match_rounds(&self) -> u32 {
        self.match_rounds
    }

    /// Role of a finalist, once roles have been assigned.
    #[must_use]
    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        let matcher = self.matcher?;
        let index = self.index_of(player)?;
        Some(if index == matcher { Role::Matcher } else { Role::Mismatcher })
    }

    /// Tallies so far as (matcher, mismatcher).
    #[must_use]
    pub fn tallies(&self) -> (u32, u32) {
        (self.matcher_tally, self.mismatcher_tally)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SuddenDeathOutcome> {
        match &self.stage {
            Stage::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.finalists.iter().position(|f| f.id == player)
    }

    fn candidates(&self) -> [PlayerId; 2] {
        [self.finalists[0].id, self.finalists[1].id]
    }

    /// Index of the finalist who reveals next in the match loop.
    fn next_revealer(&self, matcher_card: Option<Card>) -> Option<usize> {
        let matcher = self.matcher?;
        Some(if matcher_card.is_none() { matcher } else { 1 - matcher })
    }

    /// The decision a human must make right now, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Decision> {
        match &self.stage {
            Stage::Trim { index, kept } => {
                let finalist = &self.finalists[*index];
                Some(Decision::TrimHand {
                    player: finalist.id,
                    stock: finalist.hand,
                    kept: *kept,
                    remaining: (self.match_rounds - kept.total()) as usize,
                    allowed: allowed_keeps(finalist.initial, finalist.hand, *kept, self.match_rounds),
                })
            }
            Stage::Nominate if self.arbiter_controller.is_human() => Some(Decision::NominateSelector {
                arbiter: self.arbiter,
                candidates: self.candidates(),
            }),
            Stage::ChooseRole { selector } if self.finalists[*selector].controller.is_human() => {
                Some(Decision::ChooseRole {
                    player: self.finalists[*selector].id,
                })
            }
            Stage::Match { round, matcher_card } if *round <= self.match_rounds => {
                let index = self.next_revealer(*matcher_card)?;
                let finalist = &self.finalists[index];
                finalist.controller.is_human().then(|| Decision::RevealCard {
                    player: finalist.id,
                    role: if matcher_card.is_none() { Role::Matcher } else { Role::Mismatcher },
                    stock: finalist.hand,
                    round: *round as usize,
                    of: self.match_rounds as usize,
                })
            }
            _ => None,
        }
    }

    /// Run until a human decision is needed or the tie-break is settled.
    ///
    /// `seat_rngs` are the per-seat AI streams.
    pub fn advance(&mut self, seat_rngs: &mut PlayerMap<GameRng>, events: &mut Vec<SessionEvent>) -> SessionStatus {
        loop {
            if let Stage::Resolved(outcome) = &self.stage {
                return SessionStatus::Resolved(outcome.clone());
            }
            if let Some(decision) = self.pending() {
                return SessionStatus::Awaiting(decision);
            }
            self.step(seat_rngs, events);
        }
    }

    /// Apply a human answer to the pending decision, then continue.
    ///
    /// A rejected answer leaves the session untouched.
    pub fn submit(
        &mut self,
        choice: Choice,
        seat_rngs: &mut PlayerMap<GameRng>,
        events: &mut Vec<SessionEvent>,
    ) -> Result<SessionStatus, GameError> {
        let decision = self.pending().ok_or(GameError::NoPendingDecision)?;
        if decision.expects() != choice.kind() {
            return Err(GameError::UnexpectedChoice {
                expected: decision.expects(),
                got: choice.kind(),
            });
        }

        match (self.stage.clone(), choice) {
            (Stage::Trim { index, kept }, Choice::Card(card)) => {
                let finalist = &self.finalists[index];
                if !can_keep(card, finalist.initial, finalist.hand, kept, self.match_rounds) {
                    return Err(GameError::invalid(finalist.id, format!("cannot keep {card} and still complete the hand")));
                }
                self.keep_card(index, kept, card, events);
            }
            (Stage::Nominate, Choice::Nominate(selector)) => {
                let index = self
                    .index_of(selector)
                    .ok_or_else(|| GameError::invalid(self.arbiter, format!("{selector} is not a finalist")))?;
                events.push(SessionEvent::SelectorNominated {
                    arbiter: self.arbiter,
                    selector,
                });
                self.stage = Stage::ChooseRole { selector: index };
            }
            (Stage::ChooseRole { selector }, Choice::Role(role)) => {
                self.assign_roles(selector, role, events);
            }
            (Stage::Match { round, matcher_card }, Choice::Card(card)) => {
                let index = self.next_revealer(matcher_card).ok_or(GameError::NoPendingDecision)?;
                if !self.finalists[index].hand.remove(card) {
                    return Err(GameError::invalid(self.finalists[index].id, format!("no {card} card in hand")));
                }
                self.record_reveal(round, matcher_card, card, events);
            }
            _ => return Err(GameError::NoPendingDecision),
        }

        Ok(self.advance(seat_rngs, events))
    }

    /// Perform one automatic transition.
    fn step(&mut self, seat_rngs: &mut PlayerMap<GameRng>, events: &mut Vec<SessionEvent>) {
        match self.stage.clone() {
            Stage::Start => self.start(seat_rngs, events),
            Stage::Trim { .. } => {}
            Stage::Nominate => {
                let selector = ai::nominate_random(self.candidates(), &mut seat_rngs[self.arbiter]);
                trace!(arbiter = %self.arbiter, %selector, "arbiter nominated");
                events.push(SessionEvent::SelectorNominated {
                    arbiter: self.arbiter,
                    selector,
                });
                let index = if selector == self.finalists[0].id { 0 } else { 1 };
                self.stage = Stage::ChooseRole { selector: index };
            }
            Stage::ChooseRole { selector } => {
                let finalist = &self.finalists[selector];
                let role = match finalist.controller {
                    Controller::Ai(difficulty) => (ai::strategy(difficulty).role)(finalist.hand, &mut seat_rngs[finalist.id]),
                    Controller::Human => return,
                };
                trace!(player = %finalist.id, %role, "role chosen");
                self.assign_roles(selector, role, events);
            }
            Stage::Match { round, matcher_card } => {
                if round > self.match_rounds {
                    self.stage = Stage::Resolve;
                    return;
                }
                let Some(index) = self.next_revealer(matcher_card) else {
                    self.stage = Stage::Resolve;
                    return;
                };
                let finalist = &mut self.finalists[index];
                let card = ai::reveal_random(finalist.hand, &mut seat_rngs[finalist.id]);
                match card {
                    Some(card) => {
                        finalist.hand.remove(card);
                        self.record_reveal(round, matcher_card, card, events);
                    }
                    None => self.stage = Stage::Resolve,
                }
            }
            Stage::Resolve => self.resolve(events),
            Stage::Resolved(_) => {}
        }
    }

    fn start(&mut self, seat_rngs: &mut PlayerMap<GameRng>, events: &mut Vec<SessionEvent>) {
        let m = self.match_rounds;
        debug!(
            finalists = ?self.candidates(),
            arbiter = %self.arbiter,
            hands = ?[self.finalists[0].initial, self.finalists[1].initial],
            match_rounds = m,
            "sudden death started"
        );
        events.push(SessionEvent::Started {
            finalists: self.candidates(),
            arbiter: self.arbiter,
            hands: [self.finalists[0].initial, self.finalists[1].initial],
            match_rounds: m,
        });

        if m == 0 {
            self.stage = Stage::Resolve;
            return;
        }

        let sizes = [self.finalists[0].initial.total(), self.finalists[1].initial.total()];
        if sizes[0] == sizes[1] {
            self.enter_role_selection();
            return;
        }

        let larger = if sizes[0] > sizes[1] { 0 } else { 1 };
        let finalist = &mut self.finalists[larger];
        match finalist.controller {
            Controller::Ai(difficulty) => {
                let before = finalist.hand;
                finalist.hand = (ai::strategy(difficulty).trim)(before, m, &mut seat_rngs[finalist.id]);
                events.push(SessionEvent::HandTrimmed {
                    player: finalist.id,
                    from: before,
                    kept: finalist.hand,
                });
                self.enter_role_selection();
            }
            Controller::Human => {
                self.stage = Stage::Trim {
                    index: larger,
                    kept: CardCounts::default(),
                };
            }
        }
    }

    fn keep_card(&mut self, index: usize, mut kept: CardCounts, card: Card, events: &mut Vec<SessionEvent>) {
        let finalist = &mut self.finalists[index];
        finalist.hand.remove(card);
        kept.add(card);
        let remaining = self.match_rounds - kept.total();
        events.push(SessionEvent::CardKept {
            player: finalist.id,
            card,
            kept,
            remaining,
        });

        if remaining > 0 {
            self.stage = Stage::Trim { index, kept };
            return;
        }

        finalist.hand = kept;
        events.push(SessionEvent::HandTrimmed {
            player: finalist.id,
            from: finalist.initial,
            kept,
        });
        self.enter_role_selection();
    }

    fn enter_role_selection(&mut self) {
        let sizes = [self.finalists[0].initial.total(), self.finalists[1].initial.total()];
        self.stage = match sizes[0].cmp(&sizes[1]) {
            std::cmp::Ordering::Less => Stage::ChooseRole { selector: 0 },
            std::cmp::Ordering::Greater => Stage::ChooseRole { selector: 1 },
            std::cmp::Ordering::Equal => Stage::Nominate,
        };
    }

    fn assign_roles(&mut self, selector: usize, role: Role, events: &mut Vec<SessionEvent>) {
        let matcher = if role == Role::Matcher { selector } else { 1 - selector };
        self.matcher = Some(matcher);
        events.push(SessionEvent::RoleChosen {
            chosen_by: self.finalists[selector].id,
            matcher: self.finalists[matcher].id,
            mismatcher: self.finalists[1 - matcher].id,
        });
        self.stage = Stage::Match {
            round: 1,
            matcher_card: None,
        };
    }

    fn record_reveal(&mut self, round: u32, matcher_card: Option<Card>, card: Card, events: &mut Vec<SessionEvent>) {
        let Some(matcher_card) = matcher_card else {
            self.stage = Stage::Match {
                round,
                matcher_card: Some(card),
            };
            return;
        };

        let matched = matcher_card == card;
        if matched {
            self.matcher_tally += 1;
        } else {
            self.mismatcher_tally += 1;
        }
        debug!(round, %matcher_card, mismatcher_card = %card, matched, "match revealed");
        events.push(SessionEvent::MatchRevealed {
            round,
            of: self.match_rounds,
            matcher_card,
            mismatcher_card: card,
            matched,
            matcher_tally: self.matcher_tally,
            mismatcher_tally: self.mismatcher_tally,
        });

        self.stage = Stage::Match {
            round: round + 1,
            matcher_card: None,
        };
    }

    fn resolve(&mut self, events: &mut Vec<SessionEvent>) {
        let (winner, loser, decided_by_coin) = match self.matcher {
            Some(matcher) => {
                let mismatcher = 1 - matcher;
                match self.matcher_tally.cmp(&self.mismatcher_tally) {
                    std::cmp::Ordering::Greater => (matcher, mismatcher, false),
                    std::cmp::Ordering::Less => (mismatcher, matcher, false),
                    std::cmp::Ordering::Equal => {
                        if self.coin.coin_flip() {
                            (matcher, mismatcher, true)
                        } else {
                            (mismatcher, matcher, true)
                        }
                    }
                }
            }
            None => {
                if self.coin.coin_flip() {
                    (0, 1, true)
                } else {
                    (1, 0, true)
                }
            }
        };

        let winner_bonus = match self.matcher {
            Some(matcher) if winner == matcher => self.matcher_tally,
            Some(_) => self.mismatcher_tally,
            None => 0,
        };

        let outcome = SuddenDeathOutcome {
            winner: self.finalists[winner].id,
            loser: self.finalists[loser].id,
            winner_bonus,
            match_rounds: self.match_rounds,
            matcher: self.matcher.map(|i| self.finalists[i].id),
            matcher_tally: self.matcher_tally,
            mismatcher_tally: self.mismatcher_tally,
            decided_by_coin,
        };

        debug!(
            winner = %outcome.winner,
            bonus = outcome.winner_bonus,
            coin = outcome.decided_by_coin,
            "sudden death resolved"
        );
        events.push(SessionEvent::Resolved {
            outcome: outcome.clone(),
        });
        self.stage = Stage::Resolved(outcome);
    }
}
