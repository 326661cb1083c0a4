//! Grading a guess against the target.

use std::{fmt::Display, ops::Deref};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{words::Word, EpisodeError};

/// A Wordle "grade" that indicates the correctness of a letter in a guess.
///
/// `Correct` means that the letter is in the correct position. `Present`
/// means that the target has an unmatched copy of the letter elsewhere.
/// `Absent` means that the target has no more copies of the letter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Grade {
    Correct,
    Present,
    Absent,
}

impl Grade {
    /// The integer a host sees for this grade: 2, 1, and -1.
    pub fn code(self) -> i32 {
        match self {
            Grade::Correct => 2,
            Grade::Present => 1,
            Grade::Absent => -1,
        }
    }
}

/// The grades for one guess, one per letter, in guess order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Feedback {
    grades: Vec<Grade>,
}

impl Feedback {
    /// Encodes the grades as the host-facing state vector.
    pub fn codes(&self) -> Vec<i32> {
        self.grades.iter().map(|g| g.code()).collect()
    }

    /// Returns true if every letter is [`Grade::Correct`].
    pub fn is_win(&self) -> bool {
        self.grades.iter().all(|&g| g == Grade::Correct)
    }
}

impl Deref for Feedback {
    type Target = [Grade];

    fn deref(&self) -> &Self::Target {
        &self.grades
    }
}

impl From<Vec<Grade>> for Feedback {
    fn from(grades: Vec<Grade>) -> Self {
        Feedback { grades }
    }
}

impl Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for grade in &self.grades {
            let c = match grade {
                Grade::Correct => 'G',
                Grade::Present => 'Y',
                Grade::Absent => '.',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Grades `guess` against `target`.
///
/// When a guess contains two or more of the same letter, the following is
/// true:
///
/// 1. Every copy in the right position is [`Grade::Correct`].
/// 2. The remaining copies are [`Grade::Present`] left to right, until the
///    target's unmatched copies of that letter run out. The rest are
///    [`Grade::Absent`].
///
/// So against `allow`, the guess `lolly` grades its middle `l` correct,
/// its first `l` present (the target has one `l` left), and its fourth `l`
/// absent.
///
/// Returns an error if the two words differ in length.
///
/// # Examples
///
/// ```rust
/// use wordle_env::{evaluate, Word, Grade::*};
///
/// let target = Word::new("allow", 5)?;
/// let guess = Word::new("lolly", 5)?;
/// let feedback = evaluate(&guess, &target)?;
/// assert_eq!(&*feedback, &[Present, Present, Correct, Absent, Absent]);
/// #
/// # Ok::<_, wordle_env::EpisodeError>(())
/// ```
pub fn evaluate(guess: &Word, target: &Word) -> Result<Feedback, EpisodeError> {
    if guess.len() != target.len() {
        return Err(EpisodeError::MalformedWord {
            word: guess.to_string(),
            expected: target.len(),
        });
    }

    let mut grades = vec![Grade::Absent; guess.len()];
    let mut remaining = [0_usize; 26];
    let i = |c: u8| (c - b'a') as usize;

    // exact matches first, since those get priority
    for (pos, (&g, &t)) in guess.letters().iter().zip(target.letters()).enumerate() {
        if g == t {
            grades[pos] = Grade::Correct;
        } else {
            remaining[i(t)] += 1;
        }
    }

    for (pos, &g) in guess.letters().iter().enumerate() {
        if grades[pos] == Grade::Correct {
            continue;
        }
        if remaining[i(g)] > 0 {
            remaining[i(g)] -= 1;
            grades[pos] = Grade::Present;
        }
    }

    Ok(Feedback { grades })
}
