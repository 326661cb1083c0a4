//! Policies that play an episode by choosing among its recommendations.

use std::fmt::{Debug, Display};

use crate::{
    episode::{Episode, Status},
    words::Word,
    EpisodeError, Result,
};

mod greedy;
pub use greedy::Greedy;

mod sampling;
pub use sampling::Sampling;

/// The record of one played episode.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attempt {
    pub target: Word,
    pub guesses: Vec<Word>,
    pub total_reward: i32,
    pub status: Status,
}

impl Attempt {
    /// Captures the guesses and outcome of `episode` so far.
    pub fn from_episode(episode: &Episode) -> Self {
        Attempt {
            target: episode.target().clone(),
            guesses: episode.logs().iter().map(|e| e.guess.clone()).collect(),
            total_reward: episode.total_reward(),
            status: episode.status(),
        }
    }

    /// Returns true if the last guess was the target.
    pub fn solved(&self) -> bool {
        self.status == Status::Won
    }
}

impl Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some((last, rest)) = self.guesses.split_last() {
            for word in rest {
                writeln!(f, "{}", word)?;
            }
            write!(f, "{}", last)?;
        }
        Ok(())
    }
}

/// Trait defining a policy for playing episodes.
///
/// A strategy only has to pick the next action; [`play()`](Strategy::play())
/// drives the episode until it is won or lost. The harness uses
/// [`Display`] to name the strategy, so do not use linebreaks there.
///
/// # Examples
///
/// ```rust
/// use std::fmt::Display;
/// use wordle_env::{Episode, Result, Strategy};
///
/// /// Always guesses the first word still possible.
/// #[derive(Debug)]
/// struct FirstCandidate;
///
/// impl Display for FirstCandidate {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "FirstCandidate")
///     }
/// }
///
/// impl Strategy for FirstCandidate {
///     fn choose(&self, episode: &Episode) -> Result<usize> {
///         Ok(episode.candidates()[0])
///     }
///
///     fn version(&self) -> &'static str {
///         "0.1.0"
///     }
/// }
/// ```
pub trait Strategy: Display + Debug + Sync {
    /// Picks the pool index to guess next.
    fn choose(&self, episode: &Episode) -> Result<usize>;

    /// Provides a version for this strategy.
    ///
    /// Change it whenever the logic changes, so that performance records
    /// from different versions are not confused.
    fn version(&self) -> &'static str;

    /// Plays `episode` from its current state until it is over.
    fn play(&self, episode: &mut Episode) -> Result<Attempt> {
        while !episode.is_done() {
            let action = self.choose(episode)?;
            episode.step(action)?;
        }
        Ok(Attempt::from_episode(episode))
    }
}

/// Finds the pool index of a recommended word.
pub(crate) fn action_for(episode: &Episode, word: &Word) -> Result<usize> {
    episode
        .pool()
        .index_of(word)
        .ok_or_else(|| EpisodeError::NotInPool(word.to_string()).into())
}
