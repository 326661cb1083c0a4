//! Tunable game constants.
//!
//! Every number the engine uses to play, reward, and score lives in a
//! [`GameConfig`] that is handed to [`Episode::new()`](crate::Episode::new()).
//! Nothing is compiled in, so tests and hosts can vary word length, guess
//! limits, rewards, and the scoring boosts freely.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{feedback::Grade, EpisodeError};

/// The reward paid for each letter of a guess, by grade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct RewardScheme {
    pub correct: i32,
    pub present: i32,
    pub absent: i32,
}

impl Default for RewardScheme {
    fn default() -> Self {
        RewardScheme {
            correct: 10,
            present: 6,
            absent: -3,
        }
    }
}

impl RewardScheme {
    /// The reward for a single graded letter.
    pub fn value(&self, grade: Grade) -> i32 {
        match grade {
            Grade::Correct => self.correct,
            Grade::Present => self.present,
            Grade::Absent => self.absent,
        }
    }

    /// The reward for a whole guess: the sum over its letters.
    pub fn total<'a>(&self, grades: impl IntoIterator<Item = &'a Grade>) -> i32 {
        grades.into_iter().map(|&g| self.value(g)).sum()
    }
}

/// Configuration for an [`Episode`](crate::Episode).
///
/// Like the [harness](crate::Harness), the configuration methods consume
/// the existing value and return a new one.
///
/// # Examples
///
/// ```rust
/// use wordle_env::GameConfig;
///
/// let config = GameConfig::new().max_guesses(8).common_boost(1.5);
/// assert_eq!(config.max_guesses, 8);
/// assert_eq!(config.word_length, 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct GameConfig {
    /// Number of letters in every word of the episode.
    pub word_length: usize,

    /// Guesses allowed before the episode is lost.
    pub max_guesses: usize,

    pub rewards: RewardScheme,

    /// Curated first guesses, used before any feedback exists.
    pub openers: Vec<String>,

    /// Score multiplier for words in the common word list.
    pub common_boost: f64,

    /// Score multiplier for openers when ranking by probability on the
    /// opening turn.
    pub opener_boost: f64,

    /// Probability used in place of zero for a letter never seen at a
    /// position.
    pub unseen_floor: f64,

    /// Maximum number of recommendations returned.
    pub top_k: usize,

    /// Scale later-turn scores by `1 / sqrt(candidates)` before softmax.
    pub scale_by_pool_size: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            word_length: 5,
            max_guesses: 6,
            rewards: RewardScheme::default(),
            openers: ["crane", "slate", "trace", "crate", "caret"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            common_boost: 5.0,
            opener_boost: 50.0,
            unseen_floor: 1e-6,
            top_k: 10,
            scale_by_pool_size: false,
        }
    }
}

impl GameConfig {
    /// Creates a configuration with the standard Wordle rules.
    ///
    /// Defaults:
    /// 1. five letter words, six guesses
    /// 2. rewards of +10 / +6 / -3 for correct / present / absent letters
    /// 3. openers `crane`, `slate`, `trace`, `crate`, `caret`
    /// 4. a 5x common word boost and a 50x opener boost
    /// 5. ten recommendations
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from JSON. Missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn word_length(self, word_length: usize) -> Self {
        GameConfig {
            word_length,
            ..self
        }
    }

    pub fn max_guesses(self, max_guesses: usize) -> Self {
        GameConfig {
            max_guesses,
            ..self
        }
    }

    pub fn rewards(self, rewards: RewardScheme) -> Self {
        GameConfig { rewards, ..self }
    }

    pub fn openers<S: AsRef<str>>(self, openers: impl IntoIterator<Item = S>) -> Self {
        GameConfig {
            openers: openers
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            ..self
        }
    }

    pub fn common_boost(self, common_boost: f64) -> Self {
        GameConfig {
            common_boost,
            ..self
        }
    }

    pub fn opener_boost(self, opener_boost: f64) -> Self {
        GameConfig {
            opener_boost,
            ..self
        }
    }

    pub fn unseen_floor(self, unseen_floor: f64) -> Self {
        GameConfig {
            unseen_floor,
            ..self
        }
    }

    pub fn top_k(self, top_k: usize) -> Self {
        GameConfig { top_k, ..self }
    }

    pub fn scale_by_pool_size(self, scale_by_pool_size: bool) -> Self {
        GameConfig {
            scale_by_pool_size,
            ..self
        }
    }

    /// Checks the values that would make an episode meaningless.
    pub(crate) fn validate(&self) -> Result<(), EpisodeError> {
        if self.word_length == 0 {
            return Err(EpisodeError::InvalidConfig("word length must be non-zero"));
        }
        if self.max_guesses == 0 {
            return Err(EpisodeError::InvalidConfig("max guesses must be non-zero"));
        }
        if !(self.common_boost >= 0.0 && self.opener_boost >= 0.0) {
            return Err(EpisodeError::InvalidConfig("boosts must be non-negative"));
        }
        if !(self.unseen_floor > 0.0) {
            return Err(EpisodeError::InvalidConfig("unseen floor must be positive"));
        }
        Ok(())
    }
}
