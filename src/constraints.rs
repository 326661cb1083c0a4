//! Accumulated knowledge about the target, and filtering the pool by it.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Debug,
};

use crate::{
    feedback::{Feedback, Grade},
    words::Word,
};

const A_ASCII: u8 = b'a';

/// An exact set of lowercase ASCII letters, stored as a bitset.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn bit(letter: u8) -> u32 {
        debug_assert!(letter.is_ascii_lowercase());
        1 << (letter - A_ASCII)
    }

    /// Adds `letter`, returning true if it was not already present.
    pub fn insert(&mut self, letter: u8) -> bool {
        let had = self.contains(letter);
        self.0 |= Self::bit(letter);
        !had
    }

    pub fn contains(&self, letter: u8) -> bool {
        letter.is_ascii_lowercase() && self.0 & Self::bit(letter) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The letters in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (A_ASCII..=b'z').filter(move |&c| self.contains(c))
    }
}

impl Debug for LetterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter().map(char::from)).finish()
    }
}

impl FromIterator<u8> for LetterSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = LetterSet::new();
        for letter in iter {
            set.insert(letter);
        }
        set
    }
}

/// Everything the feedback so far has proven about the target.
///
/// Knowledge only ever grows: [`update()`](Constraints::update()) adds to
/// the three collections and never removes from them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constraints {
    /// Letters proven correct, by position.
    confirmed: BTreeMap<usize, u8>,

    /// Letters proven present, with the positions they are proven absent
    /// from.
    present_elsewhere: BTreeMap<u8, BTreeSet<usize>>,

    /// Letters proven to have no copies in the target.
    excluded: LetterSet,
}

impl Constraints {
    /// Creates constraints that permit every word.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one graded guess into the constraints.
    ///
    /// An absent grade only excludes a letter outright when the letter has
    /// no correct or present grade, in this guess or an earlier one. A
    /// guess with repeated letters can earn both, and there the absent
    /// grade means "no more copies" rather than "no copies".
    pub fn update(&mut self, guess: &Word, feedback: &Feedback) {
        let graded = || guess.letters().iter().copied().zip(feedback.iter().copied());

        for (pos, (letter, grade)) in graded().enumerate() {
            match grade {
                Grade::Correct => {
                    self.confirmed.insert(pos, letter);
                }
                Grade::Present => {
                    self.present_elsewhere
                        .entry(letter)
                        .or_default()
                        .insert(pos);
                }
                Grade::Absent => {}
            }
        }

        for (letter, _) in graded().filter(|&(_, grade)| grade == Grade::Absent) {
            if !self.is_known_present(letter) {
                self.excluded.insert(letter);
            }
        }
    }

    /// Returns true if `letter` has been proven to occur in the target.
    pub fn is_known_present(&self, letter: u8) -> bool {
        self.present_elsewhere.contains_key(&letter)
            || self.confirmed.values().any(|&c| c == letter)
    }

    /// Returns true if `word` is consistent with everything known.
    pub fn permits(&self, word: &Word) -> bool {
        let letters = word.letters();

        self.confirmed
            .iter()
            .all(|(&pos, &letter)| letters.get(pos) == Some(&letter))
            && !letters.iter().any(|&c| self.excluded.contains(c))
            && self.present_elsewhere.iter().all(|(&letter, positions)| {
                letters.contains(&letter)
                    && positions.iter().all(|&pos| letters.get(pos) != Some(&letter))
            })
    }

    pub fn confirmed(&self) -> &BTreeMap<usize, u8> {
        &self.confirmed
    }

    pub fn present_elsewhere(&self) -> &BTreeMap<u8, BTreeSet<usize>> {
        &self.present_elsewhere
    }

    pub fn excluded(&self) -> LetterSet {
        self.excluded
    }

    /// Returns true if nothing is known yet.
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.present_elsewhere.is_empty() && self.excluded.is_empty()
    }
}

/// Returns the words of `pool` that `constraints` permit, in pool order.
///
/// This always starts from the whole pool rather than from an earlier
/// result, so each call reflects exactly the constraints it is given.
pub fn filter<'a>(pool: &'a [Word], constraints: &Constraints) -> Vec<&'a Word> {
    filter_indices(pool, constraints)
        .into_iter()
        .map(|i| &pool[i])
        .collect()
}

/// Like [`filter()`], but returns the positions of the permitted words.
pub fn filter_indices(pool: &[Word], constraints: &Constraints) -> Vec<usize> {
    pool.iter()
        .enumerate()
        .filter(|(_, w)| constraints.permits(w))
        .map(|(i, _)| i)
        .collect()
}
