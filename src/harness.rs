//! The harness for running strategies over many episodes.

use std::ops::Deref;

use indicatif::{ParallelProgressIterator, ProgressBar};
use log::{debug, info};
use rand::seq::index::sample;
use rayon::prelude::*;

use crate::{
    perf::Perf,
    strategy::{Attempt, Strategy},
    words::{CommonWords, Word, WordPool, SAMPLE},
    Episode, EpisodeError, GameConfig, HarnessError, WordleError,
};

/// A harness that can run many strategies against many targets.
///
/// When you want to test your strategies, create a new harness with
/// [`new()`](Harness::new()). You can then configure it using various
/// methods. Note that these configuration methods consume the existing
/// [`Harness`] and return a new one.
///
/// Every strategy plays its own [`Episode`] for each target, and all the
/// episodes share one word pool.
///
/// # Examples
///
/// ```rust
/// use wordle_env::{strategy::Greedy, Harness};
///
/// let harness = Harness::new()
///     .quiet()
///     .add_strategy(Box::new(Greedy))
///     .test_num(20);
///
/// let record = harness.run()?;
/// assert_eq!(record[0].num_tried(), 20);
/// #
/// # Ok::<_, wordle_env::WordleError>(())
/// ```
#[derive(Debug)]
pub struct Harness {
    strategies: Vec<Box<dyn Strategy>>,
    verbose: bool,
    num_targets: Option<usize>,
    pool: Option<WordPool>,
    answers: Option<Vec<String>>,
    common: CommonWords,
    config: GameConfig,
}

impl Default for Harness {
    fn default() -> Self {
        Harness {
            strategies: Vec::new(),
            verbose: false,
            num_targets: Some(100),
            pool: None,
            answers: None,
            common: CommonWords::new(),
            config: GameConfig::new(),
        }
    }
}

impl Harness {
    /// Creates a new harness with default configuration.
    ///
    /// Defaults:
    /// 1. tests no strategies
    /// 2. quiet mode
    /// 3. runs each strategy on 100 targets chosen at random
    /// 4. plays over the bundled [`SAMPLE`] words, which are also the
    ///    answers
    /// 5. no common words and the default [`GameConfig`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the harness show a progress bar while running.
    pub fn verbose(self) -> Self {
        Harness {
            verbose: true,
            ..self
        }
    }

    /// Makes the harness silent while running.
    pub fn quiet(self) -> Self {
        Harness {
            verbose: false,
            ..self
        }
    }

    /// Adds a strategy to the harness for testing.
    pub fn add_strategy(self, strat: Box<dyn Strategy>) -> Self {
        let mut strategies = self.strategies;
        strategies.push(strat);
        Harness { strategies, ..self }
    }

    /// Adds a [`Vec`] of strategies to the harness for testing.
    pub fn add_strategies(self, strats: Vec<Box<dyn Strategy>>) -> Self {
        let mut strategies = self.strategies;
        strategies.extend(strats);
        Harness { strategies, ..self }
    }

    /// Sets the harness to run each strategy on every answer.
    pub fn test_all(self) -> Self {
        Harness {
            num_targets: None,
            ..self
        }
    }

    /// Sets the harness to run each strategy on `n` random answers.
    ///
    /// If there are fewer than `n` answers, every answer is run once.
    pub fn test_num(self, n: usize) -> Self {
        Harness {
            num_targets: Some(n),
            ..self
        }
    }

    /// Sets the words the strategies choose their guesses from.
    pub fn pool(self, pool: WordPool) -> Self {
        Harness {
            pool: Some(pool),
            ..self
        }
    }

    /// Sets the words targets are drawn from. They must all be in the pool.
    ///
    /// Without this, every pool word is a possible target.
    pub fn answers<S: AsRef<str>>(self, answers: impl IntoIterator<Item = S>) -> Self {
        Harness {
            answers: Some(answers.into_iter().map(|s| s.as_ref().to_string()).collect()),
            ..self
        }
    }

    pub fn common(self, common: CommonWords) -> Self {
        Harness { common, ..self }
    }

    pub fn config(self, config: GameConfig) -> Self {
        Harness { config, ..self }
    }

    /// Runs the harness and produces performances for each strategy.
    ///
    /// The [`Perf`]s will be in the same order as the strategies were added
    /// to the harness, and each one lists its attempts in the same target
    /// order.
    pub fn run(&self) -> Result<Record, WordleError> {
        if self.strategies.is_empty() {
            return Err(HarnessError::NoStrategiesAdded.into());
        }

        let pool = match &self.pool {
            Some(pool) => pool.clone(),
            None => WordPool::new(SAMPLE, self.config.word_length)?,
        };
        let answers = self.resolve_answers(&pool)?;
        if answers.is_empty() {
            return Err(HarnessError::EmptyAnswerList.into());
        }

        let targets: Vec<&Word> = match self.num_targets {
            Some(n) => {
                let mut rng = rand::thread_rng();
                sample(&mut rng, answers.len(), n.min(answers.len()))
                    .iter()
                    .map(|i| &answers[i])
                    .collect()
            }
            None => answers.iter().collect(),
        };
        info!(
            "running {} strategies on {} targets",
            self.strategies.len(),
            targets.len()
        );

        let bar = if self.verbose {
            ProgressBar::new(targets.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let results = targets
            .par_iter()
            .progress_with(bar)
            .map(|target| self.run_inner(target, &pool))
            .collect::<Result<Vec<_>, WordleError>>()?;

        let mut perfs: Vec<Perf> = self
            .strategies
            .iter()
            .map(|s| Perf::new(s.as_ref(), self.config.max_guesses))
            .collect();
        for attempts in results {
            for (perf, attempt) in perfs.iter_mut().zip(attempts) {
                perf.tries.push(attempt);
            }
        }

        Ok(Record::new(perfs))
    }

    fn resolve_answers(&self, pool: &WordPool) -> Result<Vec<Word>, EpisodeError> {
        match &self.answers {
            None => Ok(pool.to_vec()),
            Some(answers) => answers
                .iter()
                .map(|a| {
                    let word = Word::new(a, pool.word_length())?;
                    if pool.index_of(&word).is_none() {
                        return Err(EpisodeError::NotInPool(word.to_string()));
                    }
                    Ok(word)
                })
                .collect(),
        }
    }

    fn run_inner(&self, target: &Word, pool: &WordPool) -> Result<Vec<Attempt>, WordleError> {
        self.strategies
            .iter()
            .map(|strategy| {
                let mut episode = Episode::new(
                    target,
                    pool.clone(),
                    self.common.clone(),
                    self.config.clone(),
                )?;
                let attempt = strategy.play(&mut episode).map_err(|e| match e {
                    WordleError::Episode { kind } => HarnessError::StrategyFailed {
                        strategy: strategy.to_string(),
                        target: target.to_string(),
                        source: kind,
                    }
                    .into(),
                    e => e,
                })?;
                debug!("{} on {}: {:?}", strategy, target, attempt.status);
                Ok::<_, WordleError>(attempt)
            })
            .collect()
    }
}

/// The performances from one run of the [`Harness`].
#[derive(Debug, Clone, Default)]
pub struct Record {
    perfs: Vec<Perf>,
}

impl Deref for Record {
    type Target = [Perf];

    fn deref(&self) -> &Self::Target {
        &self.perfs
    }
}

impl Record {
    fn new(perfs: Vec<Perf>) -> Self {
        Self { perfs }
    }

    /// Prints each strategy's summary with its guess histogram.
    #[cfg(feature = "fancy")]
    pub fn print_report(&self) -> Result<(), WordleError> {
        for perf in self.perfs.iter() {
            perf.to_summary().print(true)?;
        }
        Ok(())
    }
}
