use std::fmt::Display;

use rand::distributions::{Distribution, WeightedIndex};

use crate::{
    episode::Episode,
    strategy::{action_for, Strategy},
    EpisodeError, Result,
};

/// A strategy that draws its guess from the episode's probability ranking.
///
/// This is how a training loop explores: likely words are guessed most
/// often, but every recommended word gets a chance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sampling;

impl Strategy for Sampling {
    fn choose(&self, episode: &Episode) -> Result<usize> {
        let ranked = episode.select_words_with_probabilities()?;
        let weights = WeightedIndex::new(ranked.iter().map(|(_, p)| *p))
            .map_err(|_| EpisodeError::EmptyCandidatePool)?;

        let (word, _) = &ranked[weights.sample(&mut rand::thread_rng())];
        action_for(episode, word)
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl Display for Sampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wordle_env::Sampling")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{words::SAMPLE, CommonWords, GameConfig, WordPool};

    #[test]
    fn draws_from_the_recommendations() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        let mut episode = Episode::new("crane", pool, CommonWords::new(), GameConfig::new()).unwrap();
        episode.step_word("slate").unwrap();

        let recommended = episode.select_words_with_probabilities().unwrap();
        for _ in 0..20 {
            let action = Sampling.choose(&episode).unwrap();
            assert!(recommended.iter().any(|(w, _)| *w == episode.pool()[action]));
        }
    }

    #[test]
    fn single_candidate_is_certain() {
        let pool = WordPool::new(["crane", "crate"], 5).unwrap();
        let mut episode = Episode::new("crate", pool, CommonWords::new(), GameConfig::new()).unwrap();
        episode.step(0).unwrap();

        assert_eq!(Sampling.choose(&episode).unwrap(), 1);
        assert!(Sampling.play(&mut episode).unwrap().solved());
    }
}
