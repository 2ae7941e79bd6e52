//! Game flow: the round controller, events, reports and standings.
//!
//! ## Flow
//!
//! ```text
//! round start ──► mini-round ×5 ──► scoring ──► (sudden death) ──► next round
//!                   │                                               │
//!                   └─ deal ► chips ► reveal ► allocate ► discard   └─ after 5: standings
//! ```
//!
//! Presenters talk to a `Game` through three things: the pending `Decision`
//! (answered with `submit`), `GameEvent`s pushed to an `Observer`, and
//! `Snapshot`s pushed through `Observer::render_state`.

pub mod controller;
pub mod event;
pub mod report;
pub mod standings;

pub use controller::{first_option, Game};
pub use event::{EventLog, GameEvent, NullObserver, Observer};
pub use report::RoundReport;
pub use standings::{StandingEntry, Standings};

use crate::core::Decision;

/// Where a game stands after `advance` or `submit`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// A human must answer this decision.
    Awaiting(Decision),
    /// The game is over.
    Finished(Standings),
}

impl Progress {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Progress::Finished(_))
    }

    /// The pending decision, if any.
    #[must_use]
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Progress::Awaiting(decision) => Some(decision),
            Progress::Finished(_) => None,
        }
    }
}
