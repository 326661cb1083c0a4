use std::fmt::Display;

use crate::{
    episode::Episode,
    strategy::{action_for, Strategy},
    words::Word,
    EpisodeError, Result,
};

/// A strategy that always guesses its episode's top recommendation.
///
/// On the opening turn the recommendations are the configured openers. If
/// none of them are in the pool, it falls back to the most probable word.
/// Words it has already guessed are skipped, so it never repeats itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Greedy;

impl Strategy for Greedy {
    fn choose(&self, episode: &Episode) -> Result<usize> {
        let fresh = |w: &Word| !episode.logs().iter().any(|e| e.guess == *w);

        let top = episode.select_top_words()?;
        if let Some(action) = top
            .iter()
            .filter(|w| fresh(*w))
            .find_map(|w| action_for(episode, w).ok())
        {
            return Ok(action);
        }

        let ranked = episode.select_words_with_probabilities()?;
        if let Some((best, _)) = ranked.iter().find(|(w, _)| fresh(w)) {
            return action_for(episode, best);
        }

        episode
            .candidates()
            .iter()
            .copied()
            .find(|&i| fresh(&episode.pool()[i]))
            .ok_or_else(|| EpisodeError::EmptyCandidatePool.into())
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

impl Display for Greedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wordle_env::Greedy")
    }
}
