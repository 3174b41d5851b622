use thiserror::Error;

use crate::stats::Stats;
use crate::term::{Loc, Term};

/// Everything that can go wrong inside the net core.
///
/// No recovery is attempted here; each kind carries the location and tags a
/// front end needs to diagnose the fault. Rule failures are ordinary return
/// values, never panics or exceptions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid term: tag {tag} or target {target} out of range")]
    InvalidTerm { tag: u64, target: u64 },

    #[error("arena exhausted: {requested} words requested with {used}/{capacity} in use")]
    ArenaExhausted {
        requested: u64,
        used: u64,
        capacity: u64,
    },

    #[error("wiring chain exceeded {limit} steps near {at:?}; the net is malformed")]
    WiringOverflow { at: Term, limit: usize },

    #[error("no rewrite rule for active pair {neg:?} ~ {pos:?}")]
    UnknownInteraction { neg: Term, pos: Term },

    #[error("step budget of {budget} reached")]
    StepLimitReached { budget: u64 },
}

impl Error {
    /// Location context for the fault, when it has one.
    pub fn location(&self) -> Option<Loc> {
        match self {
            Error::WiringOverflow { at, .. } => Some(at.target()),
            Error::UnknownInteraction { neg, .. } => Some(neg.target()),
            _ => None,
        }
    }
}

/// A failed or interrupted evaluation, carrying the statistics accumulated
/// up to the point of failure so partial results stay observable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct Halt {
    pub error: Error,
    pub stats: Stats,
}

impl Halt {
    pub fn new(error: Error, stats: Stats) -> Halt {
        Halt { error, stats }
    }
}
