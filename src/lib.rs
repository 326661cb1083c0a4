#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

// Required to rename serde
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

use thiserror::Error;

pub mod config;
pub use config::{GameConfig, RewardScheme};

pub mod words;
pub use words::{CommonWords, Word, WordPool};

pub mod feedback;
pub use feedback::{evaluate, Feedback, Grade};

pub mod constraints;
pub use constraints::{filter, Constraints, LetterSet};

pub mod frequency;
pub use frequency::{score, FrequencyModel};

pub mod select;

pub mod episode;
pub use episode::{Episode, LogEntry, Status, StepOutcome};

pub mod strategy;
pub use strategy::Strategy;

#[cfg(feature = "parallel")]
pub mod harness;
#[cfg(feature = "parallel")]
pub use harness::Harness;

pub mod perf;
pub use perf::{Perf, Summary};

#[cfg(test)]
mod mock;

/// A specialized [`Result`](std::result::Result) for this crate.
pub type Result<T, E = WordleError> = std::result::Result<T, E>;

/// The errors that `wordle_env` can produce.
#[derive(Debug, Error)]
pub enum WordleError {
    #[error("episode encountered error")]
    Episode {
        #[from]
        kind: EpisodeError,
    },

    #[error("general IO error")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("could not read game configuration")]
    Config(#[from] serde_json::Error),

    #[error("the simulation harness encountered an error")]
    Harness {
        #[from]
        kind: HarnessError,
    },
}

impl WordleError {
    /// Returns the underlying [`EpisodeError`], if this is one.
    pub fn episode(&self) -> Option<&EpisodeError> {
        match self {
            WordleError::Episode { kind } => Some(kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EpisodeError {
    /// The action index does not name a word in the pool.
    #[error("action {0} is out of range for a pool of {1} words")]
    InvalidAction(usize, usize),

    /// [`Episode::step()`] was called after the episode was won or lost.
    #[error("the episode is already over")]
    EpisodeAlreadyDone,

    /// A guess, target, or configured word does not have the configured
    /// length or contains something other than ASCII letters.
    #[error("\"{word}\" is not a {expected} letter word")]
    MalformedWord { word: String, expected: usize },

    /// No word in the pool is consistent with the feedback received.
    ///
    /// With feedback from [`evaluate()`](crate::feedback::evaluate) against
    /// a single target this only happens when the target is not in the pool.
    #[error("no word in the pool is consistent with the feedback so far")]
    EmptyCandidatePool,

    /// The string given to [`Episode::step_word()`] is not in the pool.
    #[error("the word \"{0}\" is not in the word pool")]
    NotInPool(String),

    #[error("invalid game configuration: {0}")]
    InvalidConfig(&'static str),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("no strategies have been added to the harness")]
    NoStrategiesAdded,

    #[error("there are no target words to run")]
    EmptyAnswerList,

    /// A strategy chose an action that the episode rejected.
    #[error("the strategy {strategy} failed on target {target}")]
    StrategyFailed {
        strategy: String,
        target: String,
        #[source]
        source: EpisodeError,
    },
}
