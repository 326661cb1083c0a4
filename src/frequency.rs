//! Positional letter frequencies and the word score built on them.

use crate::words::{CommonWords, Word};

/// The empirical probability of each letter at each position, over some
/// set of words.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyModel {
    probs: Vec<[f64; 26]>,
}

impl FrequencyModel {
    /// Counts the letters of `words` at each of `length` positions.
    ///
    /// Every word must have `length` letters, which a [`WordPool`](crate::WordPool) of that
    /// length guarantees.
    ///
    /// Every word contributes one letter per position, so each position's
    /// probabilities sum to one (or are all zero when `words` is empty).
    pub fn compute<'a>(words: impl IntoIterator<Item = &'a Word>, length: usize) -> Self {
        let mut counts = vec![[0_u32; 26]; length];
        let mut total = 0_u32;

        for word in words {
            debug_assert_eq!(word.len(), length, "{} does not fit the model", word);
            for (row, &c) in counts.iter_mut().zip(word.letters()) {
                row[(c - b'a') as usize] += 1;
            }
            total += 1;
        }

        let probs = counts
            .iter()
            .map(|row| {
                let mut probs = [0.0; 26];
                if total > 0 {
                    for (p, &n) in probs.iter_mut().zip(row) {
                        *p = n as f64 / total as f64;
                    }
                }
                probs
            })
            .collect();

        FrequencyModel { probs }
    }

    /// The number of positions modeled.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// The probability of `letter` at `pos`, which is zero for letters never
    /// seen there and for positions out of range.
    pub fn probability(&self, pos: usize, letter: u8) -> f64 {
        if !letter.is_ascii_lowercase() {
            return 0.0;
        }
        self.probs
            .get(pos)
            .map_or(0.0, |row| row[(letter - b'a') as usize])
    }
}

/// Scores `word` as the product of its letters' positional probabilities.
///
/// A letter never seen at its position counts as `unseen_floor` instead of
/// zero. If `common` is non-empty and contains `word`, the product is
/// multiplied by `common_boost`.
///
/// This treats positions as independent, so it favors words built from
/// letters that are common everywhere. That bias is accepted.
pub fn score(
    word: &Word,
    model: &FrequencyModel,
    common: &CommonWords,
    common_boost: f64,
    unseen_floor: f64,
) -> f64 {
    let base = word
        .letters()
        .iter()
        .enumerate()
        .map(|(pos, &c)| match model.probability(pos, c) {
            p if p > 0.0 => p,
            _ => unseen_floor,
        })
        .product::<f64>();

    if !common.is_empty() && common.contains(word) {
        base * common_boost
    } else {
        base
    }
}
