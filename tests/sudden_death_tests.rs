//! Sudden-death tests.
//!
//! Sessions are exercised directly for the hand-adjustment and coin-flip
//! rules, and through full games for the scoring that follows them.

mod common;

use equilibrium_market::core::{Card, CardCounts, Choice, Controller, Decision, Difficulty, GameRng, PlayerId, PlayerMap, Role};
use equilibrium_market::game::{first_option, EventLog, Game, GameEvent, NullObserver, Progress};
use equilibrium_market::rules::{
    allowed_keeps, Finalist, ScoringCase, SessionEvent, SessionStatus, SuddenDeathSession,
};

fn seat_rngs(seed: u64) -> PlayerMap<GameRng> {
    let root = GameRng::new(seed);
    PlayerMap::new(|p| root.for_context(p.name()))
}

/// Test that 5 cards against 3 gives three match rounds and a trimmed hand.
#[test]
fn test_five_against_three() {
    let mut session = SuddenDeathSession::new(
        [
            Finalist::new(PlayerId::CpuA, Controller::Ai(Difficulty::Hard), CardCounts::new(4, 1)),
            Finalist::new(PlayerId::CpuB, Controller::Ai(Difficulty::Hard), CardCounts::new(1, 2)),
        ],
        PlayerId::You,
        Controller::Human,
        GameRng::new(11),
    );
    assert_eq!(session.match_rounds(), 3);

    let mut log = Vec::new();
    let SessionStatus::Resolved(outcome) = session.advance(&mut seat_rngs(11), &mut log) else {
        panic!("AI finalists and a smaller-handed selector need no input");
    };

    // Minority colour is blue: keep the single blue and two reds.
    assert!(log.iter().any(|e| matches!(
        e,
        SessionEvent::HandTrimmed { player: PlayerId::CpuA, kept, .. } if *kept == CardCounts::new(2, 1)
    )));
    // CpuB holds 1R/2B: |1 - 2| * 5 > 3, so the hard tier picks mismatcher.
    assert_eq!(outcome.matcher, Some(PlayerId::CpuA));
    assert_eq!(outcome.matcher_tally + outcome.mismatcher_tally, 3);
    assert!(!outcome.decided_by_coin);
    assert!(outcome.winner_bonus >= 2);
}

/// Test that two empty hands skip everything and flip a coin for no bonus.
#[test]
fn test_empty_hands_flip_coin() {
    let mut winners = Vec::new();

    for seed in 0..16 {
        let mut session = SuddenDeathSession::new(
            [
                Finalist::new(PlayerId::You, Controller::Human, CardCounts::default()),
                Finalist::new(PlayerId::CpuB, Controller::Ai(Difficulty::Easy), CardCounts::default()),
            ],
            PlayerId::CpuA,
            Controller::Ai(Difficulty::Easy),
            GameRng::new(seed),
        );

        let SessionStatus::Resolved(outcome) = session.advance(&mut seat_rngs(seed), &mut Vec::new()) else {
            panic!("no decisions are needed without cards");
        };
        assert_eq!(outcome.match_rounds, 0);
        assert_eq!(outcome.winner_bonus, 0);
        assert!(outcome.decided_by_coin);
        winners.push(outcome.winner);
    }

    assert!(winners.contains(&PlayerId::You));
    assert!(winners.contains(&PlayerId::CpuB));
}

/// Test the feasibility rule while a human trims 4 red + 1 blue down to 3.
#[test]
fn test_human_trim_feasibility() {
    let initial = CardCounts::new(4, 1);
    let mut rngs = seat_rngs(2);
    let mut session = SuddenDeathSession::new(
        [
            Finalist::new(PlayerId::You, Controller::Human, initial),
            Finalist::new(PlayerId::CpuA, Controller::Ai(Difficulty::Medium), CardCounts::new(3, 0)),
        ],
        PlayerId::CpuB,
        Controller::Ai(Difficulty::Medium),
        GameRng::new(2),
    );

    let mut status = session.advance(&mut rngs, &mut Vec::new());
    let mut kept = 0;
    while let SessionStatus::Awaiting(Decision::TrimHand { stock, kept: so_far, allowed, remaining, .. }) = &status {
        assert_eq!(*allowed, allowed_keeps(initial, *stock, *so_far, 3));
        assert_eq!(*remaining as u32, 3 - so_far.total());
        // Prefer blue while it lasts.
        let card = if allowed.contains(&Card::Blue) { Card::Blue } else { Card::Red };
        status = session.submit(Choice::Card(card), &mut rngs, &mut Vec::new()).unwrap();
        kept += 1;
    }

    assert_eq!(kept, 3);
    assert_eq!(session.finalists()[0].initial, initial);
    assert!(session.role_of(PlayerId::CpuA).is_some());
}

/// Test that a human selector's role choice assigns the opposite to the other finalist.
#[test]
fn test_human_role_choice() {
    let mut rngs = seat_rngs(6);
    let mut session = SuddenDeathSession::new(
        [
            Finalist::new(PlayerId::CpuA, Controller::Ai(Difficulty::Easy), CardCounts::new(2, 2)),
            Finalist::new(PlayerId::You, Controller::Human, CardCounts::new(1, 1)),
        ],
        PlayerId::CpuB,
        Controller::Ai(Difficulty::Easy),
        GameRng::new(6),
    );

    let status = session.advance(&mut rngs, &mut Vec::new());
    // CpuA trims automatically; the smaller-handed human then picks a role.
    assert_eq!(status, SessionStatus::Awaiting(Decision::ChooseRole { player: PlayerId::You }));

    let status = session.submit(Choice::Role(Role::Mismatcher), &mut rngs, &mut Vec::new()).unwrap();
    assert_eq!(session.role_of(PlayerId::You), Some(Role::Mismatcher));
    assert_eq!(session.role_of(PlayerId::CpuA), Some(Role::Matcher));

    // The matcher reveals first, so the human is asked next.
    let SessionStatus::Awaiting(Decision::RevealCard { player, role, round, of, .. }) = status else {
        panic!("expected a reveal decision");
    };
    assert_eq!((player, role, round, of), (PlayerId::You, Role::Mismatcher, 1, 2));
}

/// Test that sudden death in real games scores basic + bonus, basic and zero.
#[test]
fn test_sudden_death_scoring_in_games() {
    common::init_logging();
    let mut sessions = 0;
    let mut log = EventLog::new();

    for seed in 0..60 {
        log.clear();
        let mut game = Game::new(common::unattended(seed, Difficulty::Medium));
        let Progress::Finished(_) = game.advance(&mut log) else {
            panic!("unattended game should finish");
        };

        // Tie-break events reach the game's observer.
        let tie_breaks = game.history().iter().filter(|r| r.sudden_death.is_some()).count();
        let started = log.events().iter().filter(|e| matches!(e, GameEvent::SuddenDeathStarted { .. })).count();
        let resolved: Vec<_> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::SuddenDeathResolved { outcome } => Some(outcome.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(started, tie_breaks);
        assert_eq!(resolved.len(), tie_breaks);

        for report in game.history() {
            let ScoringCase::SuddenDeath { finalists, arbiter, basic } = report.case else {
                assert!(report.sudden_death.is_none());
                continue;
            };
            let outcome = report.sudden_death.as_ref().unwrap();
            assert!(resolved.contains(outcome));
            sessions += 1;

            assert!(finalists.contains(&outcome.winner));
            assert!(finalists.contains(&outcome.loser));
            assert_eq!(report.delta(outcome.winner), basic + outcome.winner_bonus);
            assert_eq!(report.delta(outcome.loser), basic);
            assert_eq!(report.delta(arbiter), 0);
            assert_eq!(report.basic[finalists[0]], report.basic[finalists[1]]);
        }
    }

    assert!(sessions > 0);
}

/// Test that a human seat can answer every sudden-death decision.
#[test]
fn test_human_plays_through_sudden_death() {
    let mut decisions = 0;

    for seed in 0..40 {
        let mut game = Game::new(common::config(seed, Difficulty::Hard));
        let mut progress = game.advance(&mut NullObserver);

        while let Progress::Awaiting(decision) = progress {
            if matches!(
                decision,
                Decision::TrimHand { .. }
                    | Decision::ChooseRole { .. }
                    | Decision::NominateSelector { .. }
                    | Decision::RevealCard { .. }
            ) {
                assert!(game.sudden_death().is_some());
                decisions += 1;
            }
            progress = game.submit(first_option(&decision), &mut NullObserver).unwrap();
        }
    }

    assert!(decisions > 0);
}
