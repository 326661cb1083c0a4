//! A single game: the running state and the entry points a host drives.

use std::fmt::Display;

use itertools::Itertools;
use log::{debug, trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    config::GameConfig,
    constraints::{filter_indices, Constraints},
    feedback::{evaluate, Feedback},
    frequency::{score, FrequencyModel},
    select,
    words::{CommonWords, Word, WordPool},
    EpisodeError, Result,
};

/// Where an [`Episode`] is in its life.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Status {
    InProgress,
    Won,
    Lost,
}

impl Status {
    /// Returns true for [`Status::Won`] and [`Status::Lost`].
    pub fn is_done(self) -> bool {
        self != Status::InProgress
    }
}

/// What a host receives from [`Episode::step()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// One code per letter: 2 correct, 1 present, -1 absent.
    pub state: Vec<i32>,
    pub reward: i32,
    pub done: bool,
    pub feedback: Feedback,
}

/// One guess as recorded in the episode log.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LogEntry {
    pub guess: Word,
    pub feedback: Feedback,
    pub reward: i32,
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GUESS: \"{}\" - STATE - [{}] - REWARD - {}",
            self.guess,
            self.feedback.codes().iter().join(", "),
            self.reward
        )
    }
}

/// A single Wordle episode against a fixed target.
///
/// The episode owns its constraints, candidates, and log. The word pool and
/// common words are shared, so many episodes can run side by side over one
/// pool, but a single episode should only be driven by one caller.
///
/// # Examples
///
/// ```rust
/// use wordle_env::{CommonWords, Episode, GameConfig, Status, WordPool};
///
/// let pool = WordPool::new(["crane", "slate", "trace", "crate", "caret"], 5)?;
/// let mut episode = Episode::new("crate", pool, CommonWords::new(), GameConfig::new())?;
///
/// let outcome = episode.step(0)?; // crane
/// assert_eq!(outcome.state, vec![2, 2, 2, -1, 2]);
/// assert_eq!(outcome.reward, 37);
/// assert!(!outcome.done);
///
/// let top = episode.select_top_words()?;
/// assert_eq!(&*top[0], "crate");
///
/// episode.step(3)?;
/// assert_eq!(episode.status(), Status::Won);
/// #
/// # Ok::<_, wordle_env::WordleError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Episode {
    target: Word,
    pool: WordPool,
    common: CommonWords,
    openers: Vec<Word>,
    config: GameConfig,

    status: Status,
    state: Vec<i32>,
    constraints: Constraints,
    candidates: Vec<usize>,
    model: FrequencyModel,
    history: Vec<LogEntry>,
    total_reward: i32,
}

impl Episode {
    /// Creates a new episode, ready for its first guess.
    ///
    /// Returns an error if the configuration is degenerate, or if the
    /// target, any opener, or the pool's words do not have
    /// `config.word_length` letters.
    pub fn new(
        target: &str,
        pool: WordPool,
        common: CommonWords,
        config: GameConfig,
    ) -> Result<Self> {
        config.validate()?;

        let length = config.word_length;
        let target = Word::new(target, length)?;
        if pool.word_length() != length {
            return Err(EpisodeError::MalformedWord {
                word: pool.first().map_or_else(String::new, |w| w.to_string()),
                expected: length,
            }
            .into());
        }
        let openers = config
            .openers
            .iter()
            .map(|s| Word::new(s, length))
            .collect::<Result<Vec<_>, _>>()?;

        let mut episode = Episode {
            target,
            pool,
            common,
            openers,
            config,
            status: Status::InProgress,
            state: Vec::new(),
            constraints: Constraints::new(),
            candidates: Vec::new(),
            model: FrequencyModel::compute(&[] as &[Word], 0),
            history: Vec::new(),
            total_reward: 0,
        };
        episode.reset();

        Ok(episode)
    }

    /// Returns the episode to its initial state with the same target and
    /// pool, and returns the initial state vector (all zeros).
    pub fn reset(&mut self) -> Vec<i32> {
        self.status = Status::InProgress;
        self.state = vec![0; self.config.word_length];
        self.constraints = Constraints::new();
        self.history.clear();
        self.total_reward = 0;
        self.refresh_candidates();

        self.state.clone()
    }

    /// Guesses the pool word at index `action`.
    ///
    /// Grades the guess, pays the reward for it, folds the grades into the
    /// constraints, and records it in the log. The episode is won when the
    /// guess is the target and lost when the guess limit is reached.
    ///
    /// Returns an error without changing anything if the episode is over or
    /// `action` does not name a pool word.
    pub fn step(&mut self, action: usize) -> Result<StepOutcome> {
        if self.status.is_done() {
            return Err(EpisodeError::EpisodeAlreadyDone.into());
        }
        let guess = self
            .pool
            .get(action)
            .ok_or(EpisodeError::InvalidAction(action, self.pool.len()))?
            .clone();

        let feedback = evaluate(&guess, &self.target)?;
        let reward = self.config.rewards.total(feedback.iter());

        self.constraints.update(&guess, &feedback);
        self.refresh_candidates();
        self.total_reward += reward;
        self.state = feedback.codes();
        self.history.push(LogEntry {
            guess: guess.clone(),
            feedback: feedback.clone(),
            reward,
        });

        self.status = if guess == self.target {
            Status::Won
        } else if self.history.len() >= self.config.max_guesses {
            Status::Lost
        } else {
            Status::InProgress
        };

        debug!(
            "guess {} of {}: {} {} reward {} ({} candidates left, {:?})",
            self.history.len(),
            self.config.max_guesses,
            guess,
            feedback,
            reward,
            self.candidates.len(),
            self.status
        );

        Ok(StepOutcome {
            state: self.state.clone(),
            reward,
            done: self.status.is_done(),
            feedback,
        })
    }

    /// Guesses `word`, which must be in the pool.
    pub fn step_word(&mut self, word: &str) -> Result<StepOutcome> {
        let action = self
            .pool
            .index_of(word)
            .ok_or_else(|| EpisodeError::NotInPool(word.to_string()))?;
        self.step(action)
    }

    /// Recommends up to `top_k` next guesses, best first.
    ///
    /// Before the first guess this returns the first `top_k` configured
    /// openers without scoring anything. Afterwards it scores the remaining
    /// candidates and keeps the best.
    pub fn select_top_words(&self) -> Result<Vec<Word>> {
        if self.history.is_empty() {
            return Ok(self.openers.iter().take(self.config.top_k).cloned().collect());
        }
        self.ensure_candidates()?;

        let scored = self.candidate_words().map(|w| (w, self.score(w))).collect_vec();
        trace!("scored {} candidates for top words", scored.len());

        Ok(select::top_k(scored, self.config.top_k)
            .into_iter()
            .map(|(w, _)| w.clone())
            .collect())
    }

    /// Recommends up to `top_k` next guesses with softmax probabilities,
    /// most probable first.
    ///
    /// Before the first guess every pool word is scored and the openers
    /// get an extra `opener_boost`. Afterwards only the remaining
    /// candidates are scored. Either way the probabilities are normalized
    /// over everything scored, so the returned ones sum to at most one.
    pub fn select_words_with_probabilities(&self) -> Result<Vec<(Word, f64)>> {
        self.ensure_candidates()?;
        let scored = if self.history.is_empty() {
            self.pool
                .iter()
                .map(|w| {
                    let mut s = self.score(w);
                    if self.openers.contains(w) {
                        s *= self.config.opener_boost;
                    }
                    (w, s)
                })
                .collect_vec()
        } else {
            let factor = if self.config.scale_by_pool_size {
                1.0 / (self.candidates.len() as f64).sqrt()
            } else {
                1.0
            };
            self.candidate_words()
                .map(|w| (w, self.score(w) * factor))
                .collect_vec()
        };
        trace!("ranking {} words by probability", scored.len());

        Ok(select::rank_by_probability(scored, self.config.top_k)
            .into_iter()
            .map(|(w, p)| (w.clone(), p))
            .collect())
    }

    /// The human-readable log, one entry per guess.
    pub fn logs(&self) -> &[LogEntry] {
        &self.history
    }

    /// The log rendered as strings.
    pub fn log_lines(&self) -> Vec<String> {
        self.history.iter().map(|e| e.to_string()).collect()
    }

    pub fn target(&self) -> &Word {
        &self.target
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    pub fn guess_count(&self) -> usize {
        self.history.len()
    }

    /// The state vector from the latest guess, or zeros before any.
    pub fn state(&self) -> &[i32] {
        &self.state
    }

    pub fn total_reward(&self) -> i32 {
        self.total_reward
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The pool indices of the words still consistent with the feedback.
    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    /// The frequency model over the current candidates.
    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    fn refresh_candidates(&mut self) {
        self.candidates = filter_indices(&self.pool, &self.constraints);
        self.model = FrequencyModel::compute(self.candidate_words(), self.config.word_length);

        if self.candidates.is_empty() {
            warn!("no candidates remain for target {}", self.target);
        }
    }

    fn ensure_candidates(&self) -> Result<(), EpisodeError> {
        if self.candidates.is_empty() {
            Err(EpisodeError::EmptyCandidatePool)
        } else {
            Ok(())
        }
    }

    fn candidate_words(&self) -> impl Iterator<Item = &Word> + '_ {
        self.candidates.iter().map(move |&i| &self.pool[i])
    }

    fn score(&self, word: &Word) -> f64 {
        score(
            word,
            &self.model,
            &self.common,
            self.config.common_boost,
            self.config.unseen_floor,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{config::RewardScheme, feedback::Grade, words::SAMPLE, WordleError};

    const SMALL: [&str; 10] = [
        "crane", "slate", "trace", "crate", "caret", "apple", "grape", "berry", "melon", "peach",
    ];

    fn episode(target: &str) -> Episode {
        let pool = WordPool::new(SMALL, 5).unwrap();
        Episode::new(target, pool, CommonWords::new(), GameConfig::new()).unwrap()
    }

    fn kind(err: WordleError) -> EpisodeError {
        err.episode().cloned().expect("not an episode error")
    }

    #[test]
    fn starts_in_progress_with_zero_state() {
        let episode = episode("crane");
        assert_eq!(episode.status(), Status::InProgress);
        assert_eq!(episode.state(), &[0; 5]);
        assert_eq!(episode.guess_count(), 0);
        assert_eq!(episode.candidates().len(), SMALL.len());
        assert!(episode.logs().is_empty());
        assert_eq!(&**episode.target(), "crane");
    }

    #[test]
    fn slate_against_crane() {
        let mut episode = episode("crane");
        let outcome = episode.step(1).unwrap();

        use Grade::*;
        assert_eq!(&*outcome.feedback, &[Absent, Absent, Correct, Absent, Correct]);
        assert_eq!(outcome.state, vec![-1, -1, 2, -1, 2]);
        assert_eq!(outcome.reward, 11);
        assert!(!outcome.done);
        assert_eq!(episode.total_reward(), 11);
    }

    #[test]
    fn reward_follows_duplicate_aware_grades() {
        let pool = WordPool::new(["lolly", "allow"], 5).unwrap();
        let mut episode = Episode::new("allow", pool, CommonWords::new(), GameConfig::new()).unwrap();

        let outcome = episode.step(0).unwrap();
        assert_eq!(outcome.state, vec![1, 1, 2, -1, -1]);
        assert_eq!(outcome.reward, 6 + 6 + 10 - 3 - 3);
    }

    #[test]
    fn winning_ends_the_episode() {
        let mut episode = episode("crate");
        let outcome = episode.step(3).unwrap();
        assert!(outcome.done);
        assert_eq!(outcome.reward, 50);
        assert_eq!(episode.status(), Status::Won);
        assert_eq!(kind(episode.step(0).unwrap_err()), EpisodeError::EpisodeAlreadyDone);
    }

    #[test]
    fn sixth_miss_loses_and_seventh_step_fails() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let mut episode = Episode::new("crane", pool, CommonWords::new(), GameConfig::new()).unwrap();

        for (i, word) in ["about", "above", "abuse", "actor", "acute", "admit"]
            .iter()
            .enumerate()
        {
            assert_eq!(episode.status(), Status::InProgress);
            let outcome = episode.step_word(word).unwrap();
            assert_eq!(outcome.done, i == 5);
        }

        assert_eq!(episode.status(), Status::Lost);
        assert_eq!(kind(episode.step(0).unwrap_err()), EpisodeError::EpisodeAlreadyDone);
        assert_eq!(episode.guess_count(), 6);
    }

    #[test]
    fn guess_limit_is_configurable() {
        let pool = WordPool::new(SMALL, 5).unwrap();
        let config = GameConfig::new().max_guesses(2);
        let mut episode = Episode::new("peach", pool, CommonWords::new(), config).unwrap();

        assert!(!episode.step(0).unwrap().done);
        assert!(episode.step(1).unwrap().done);
        assert_eq!(episode.status(), Status::Lost);
    }

    #[test]
    fn bad_actions_change_nothing() {
        let mut episode = episode("crane");
        assert_eq!(
            kind(episode.step(SMALL.len()).unwrap_err()),
            EpisodeError::InvalidAction(SMALL.len(), SMALL.len())
        );
        assert_eq!(
            kind(episode.step_word("zesty").unwrap_err()),
            EpisodeError::NotInPool("zesty".to_string())
        );
        assert_eq!(episode.guess_count(), 0);
        assert!(episode.constraints().is_empty());
    }

    #[test]
    fn malformed_words_are_rejected_at_construction() {
        let pool = WordPool::new(SMALL, 5).unwrap();
        let err = Episode::new("cranes", pool.clone(), CommonWords::new(), GameConfig::new());
        assert!(matches!(
            kind(err.unwrap_err()),
            EpisodeError::MalformedWord { expected: 5, .. }
        ));

        let err = Episode::new("crane", pool.clone(), CommonWords::new(), GameConfig::new().word_length(4));
        assert!(matches!(
            kind(err.unwrap_err()),
            EpisodeError::MalformedWord { expected: 4, .. }
        ));

        let config = GameConfig::new().openers(["crane", "slat"]);
        let err = Episode::new("crane", pool, CommonWords::new(), config);
        assert!(matches!(
            kind(err.unwrap_err()),
            EpisodeError::MalformedWord { expected: 5, .. }
        ));
    }

    #[test]
    fn other_word_lengths_work() {
        let pool = WordPool::new(["bake", "lake", "lion", "bike"], 4).unwrap();
        let config = GameConfig::new().word_length(4).openers(["lake"]);
        let mut episode = Episode::new("bike", pool, CommonWords::new(), config).unwrap();

        assert_eq!(episode.reset(), vec![0; 4]);
        assert_eq!(&*episode.select_top_words().unwrap()[0], "lake");

        // lake: l absent, a absent, k correct, e correct
        episode.step(1).unwrap();
        let top = episode.select_top_words().unwrap();
        assert_eq!(top.iter().map(|w| &**w).collect::<Vec<_>>(), vec!["bike"]);
    }

    #[test]
    fn reset_restores_the_opening_state() {
        let mut episode = episode("crate");
        episode.step(0).unwrap();
        episode.step(3).unwrap();
        assert!(episode.is_done());

        assert_eq!(episode.reset(), vec![0; 5]);
        assert_eq!(episode.status(), Status::InProgress);
        assert!(episode.constraints().is_empty());
        assert!(episode.logs().is_empty());
        assert_eq!(episode.total_reward(), 0);
        assert_eq!(episode.candidates().len(), SMALL.len());
        assert_eq!(episode.model(), &FrequencyModel::compute(episode.pool().iter(), 5));
        assert_eq!(&**episode.target(), "crate");
        assert!(episode.step(3).unwrap().done);
    }

    #[test]
    fn logs_summarize_each_guess() {
        let mut episode = episode("crate");
        episode.step(0).unwrap();
        episode.step(3).unwrap();

        assert_eq!(
            episode.log_lines(),
            vec![
                "GUESS: \"crane\" - STATE - [2, 2, 2, -1, 2] - REWARD - 37",
                "GUESS: \"crate\" - STATE - [2, 2, 2, 2, 2] - REWARD - 50",
            ]
        );
        assert_eq!(episode.logs()[1].reward, 50);
    }

    #[test]
    fn opening_top_words_are_the_openers() {
        let episode = episode("peach");
        let top = episode.select_top_words().unwrap();
        assert_eq!(
            top.iter().map(|w| &**w).collect::<Vec<_>>(),
            vec!["crane", "slate", "trace", "crate", "caret"]
        );
    }

    #[test]
    fn opening_top_words_respect_top_k() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let config = GameConfig::new().top_k(2);
        let episode = Episode::new("youth", pool, CommonWords::new(), config).unwrap();

        let top = episode.select_top_words().unwrap();
        assert_eq!(top.iter().map(|w| &**w).collect::<Vec<_>>(), vec!["crane", "slate"]);
    }

    #[test]
    fn later_top_words_come_from_candidates() {
        let mut episode = episode("peach");
        // crane: c present, r absent, a correct, n absent, e present
        episode.step(0).unwrap();
        let top = episode.select_top_words().unwrap();
        assert_eq!(top.iter().map(|w| &**w).collect::<Vec<_>>(), vec!["peach"]);
        assert_eq!(episode.candidates(), &[9]);
    }

    #[test]
    fn opening_probabilities_favor_openers() {
        let episode = episode("peach");
        let ranked = episode.select_words_with_probabilities().unwrap();

        assert_eq!(ranked.len(), 10);
        assert_eq!(
            ranked.iter().take(5).map(|(w, _)| &**w).collect::<Vec<_>>(),
            vec!["crate", "crane", "trace", "slate", "caret"]
        );
        // apple and berry score within rounding of each other; apple is first in the pool too
        assert_eq!(&*ranked[7].0, "apple");
        assert_eq!(&*ranked[8].0, "berry");

        let total: f64 = ranked.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probabilities_are_capped_at_top_k() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let config = GameConfig::new().top_k(3);
        let episode = Episode::new("crane", pool, CommonWords::new(), config).unwrap();

        let ranked = episode.select_words_with_probabilities().unwrap();
        assert_eq!(ranked.len(), 3);
        let total: f64 = ranked.iter().map(|(_, p)| p).sum();
        assert!(total <= 1.0 + 1e-9);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn later_probabilities_cover_candidates_only() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let mut episode = Episode::new("crane", pool, CommonWords::new(), GameConfig::new()).unwrap();
        episode.step_word("slate").unwrap();

        let ranked = episode.select_words_with_probabilities().unwrap();
        assert!(!ranked.is_empty());
        for (word, p) in &ranked {
            assert!(episode.constraints().permits(word));
            assert!(*p > 0.0 && *p <= 1.0);
        }
        assert!(ranked.iter().any(|(w, _)| &**w == "crane"));

        let scaled = Episode::new(
            "crane",
            episode.pool().clone(),
            CommonWords::new(),
            GameConfig::new().scale_by_pool_size(true),
        )
        .map(|mut e| {
            e.step_word("slate").unwrap();
            e.select_words_with_probabilities().unwrap()
        })
        .unwrap();
        let words = |r: &[(Word, f64)]| r.iter().map(|(w, _)| w.clone()).collect::<Vec<_>>();
        assert_eq!(words(&ranked), words(&scaled));
    }

    #[test]
    fn contradictions_surface_as_empty_pool() {
        let pool = WordPool::new(["crane", "slate"], 5).unwrap();
        let mut episode = Episode::new("fuzzy", pool, CommonWords::new(), GameConfig::new()).unwrap();

        let outcome = episode.step(0).unwrap();
        assert_eq!(outcome.reward, -15);
        assert!(episode.candidates().is_empty());
        assert_eq!(
            kind(episode.select_top_words().unwrap_err()),
            EpisodeError::EmptyCandidatePool
        );
        assert_eq!(
            kind(episode.select_words_with_probabilities().unwrap_err()),
            EpisodeError::EmptyCandidatePool
        );
    }

    #[test]
    fn empty_common_words_match_never_matching_ones() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let unrelated: CommonWords = ["zzzzz", "qqqqq"].iter().collect();

        let rank = |common: CommonWords| {
            let mut episode =
                Episode::new("crane", pool.clone(), common, GameConfig::new()).unwrap();
            episode.step_word("trace").unwrap();
            (
                episode.select_top_words().unwrap(),
                episode.select_words_with_probabilities().unwrap(),
            )
        };

        assert_eq!(rank(CommonWords::new()), rank(unrelated));
    }

    #[test]
    fn common_words_can_reorder() {
        let pool = WordPool::new(SMALL, 5).unwrap();
        let common: CommonWords = ["peach"].iter().collect();
        let config = GameConfig::new().common_boost(1e6);
        let mut episode = Episode::new("berry", pool, common, config).unwrap();

        // melon leaves berry and peach, which score the same unboosted
        episode.step(8).unwrap();
        let top = episode.select_top_words().unwrap();
        assert_eq!(top.iter().map(|w| &**w).collect::<Vec<_>>(), vec!["peach", "berry"]);
    }

    #[test]
    fn rewards_are_configurable() {
        let pool = WordPool::new(SMALL, 5).unwrap();
        let rewards = RewardScheme {
            correct: 1,
            present: 0,
            absent: -1,
        };
        let config = GameConfig::new().rewards(rewards);
        let mut episode = Episode::new("crane", pool, CommonWords::new(), config).unwrap();
        assert_eq!(episode.step(1).unwrap().reward, -1);
    }

    #[test]
    fn long_words_step_cleanly() {
        let pool = WordPool::new(["b".repeat(300)], 300).unwrap();
        let config = GameConfig::new().word_length(300).openers(Vec::<String>::new());
        let mut episode = Episode::new(&"a".repeat(300), pool, CommonWords::new(), config).unwrap();

        let outcome = episode.step(0).unwrap();
        assert!(outcome.state.iter().all(|&s| s == -1));
        assert_eq!(outcome.reward, -3 * 300);
    }

    #[test]
    fn episodes_share_a_pool() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let a = Episode::new("crane", pool.clone(), CommonWords::new(), GameConfig::new()).unwrap();
        let b = Episode::new("slate", pool, CommonWords::new(), GameConfig::new()).unwrap();
        assert!(a.pool().shares(b.pool()));
    }
}
