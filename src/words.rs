//! Words, the word pool, and the common word list.

use std::{
    collections::HashSet,
    fmt::Display,
    ops::{Deref, Index},
    sync::Arc,
};

use crate::EpisodeError;

/// A validated word.
///
/// Every [`Word`] is lowercase ASCII and has the length it was checked
/// against when constructed, so the engine can index its letters freely.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word {
    inner: Box<str>,
}

impl Word {
    /// Creates a new [`Word`] of exactly `length` letters.
    ///
    /// Surrounding whitespace is trimmed and letters are lowercased. Returns
    /// an error if anything but ASCII letters remain or the length is wrong.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wordle_env::Word;
    /// let crane = Word::new(" CRANE\n", 5)?;
    /// assert_eq!(&*crane, "crane");
    ///
    /// assert!(Word::new("cranes", 5).is_err());
    /// assert!(Word::new("cr4ne", 5).is_err());
    /// #
    /// # Ok::<_, wordle_env::EpisodeError>(())
    /// ```
    pub fn new(word: &str, length: usize) -> Result<Self, EpisodeError> {
        let trimmed = word.trim();
        if trimmed.len() != length || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(EpisodeError::MalformedWord {
                word: word.to_string(),
                expected: length,
            });
        }

        Ok(Word {
            inner: trimmed.to_ascii_lowercase().into_boxed_str(),
        })
    }

    /// The letters of the word as ASCII bytes.
    pub fn letters(&self) -> &[u8] {
        self.inner.as_bytes()
    }
}

impl Deref for Word {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.deref())
    }
}

/// The ordered universe of legal guesses for an episode.
///
/// Action indices name words by their position here. The pool is immutable
/// and cloning it only bumps a reference count, so any number of episodes
/// can share one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordPool {
    words: Arc<[Word]>,
    length: usize,
}

impl WordPool {
    /// Builds a pool, validating that every word has `length` letters.
    pub fn new<S: AsRef<str>>(
        words: impl IntoIterator<Item = S>,
        length: usize,
    ) -> Result<Self, EpisodeError> {
        let words = words
            .into_iter()
            .map(|w| Word::new(w.as_ref(), length))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WordPool {
            words: words.into(),
            length,
        })
    }

    /// The length of every word in the pool.
    pub fn word_length(&self) -> usize {
        self.length
    }

    pub fn get(&self, index: usize) -> Option<&Word> {
        self.words.get(index)
    }

    /// Finds the action index of `word`, ignoring case.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        let word = word.trim();
        self.words
            .iter()
            .position(|w| w.eq_ignore_ascii_case(word))
    }

    /// Returns true if this pool and `other` are the same allocation.
    pub(crate) fn shares(&self, other: &WordPool) -> bool {
        Arc::ptr_eq(&self.words, &other.words)
    }
}

impl Deref for WordPool {
    type Target = [Word];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}

impl Index<usize> for WordPool {
    type Output = Word;

    fn index(&self, index: usize) -> &Self::Output {
        &self.words[index]
    }
}

/// Words that receive a scoring boost.
///
/// Entries are compared case-insensitively. Entries whose length differs
/// from the episode's word length are kept but can never match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommonWords {
    inner: Arc<HashSet<String>>,
}

impl CommonWords {
    /// Creates an empty list, which boosts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.inner.contains(word)
    }
}

impl<S: AsRef<str>> FromIterator<S> for CommonWords {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        CommonWords {
            inner: Arc::new(
                iter.into_iter()
                    .map(|s| s.as_ref().trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        }
    }
}

/// A small bundled list of five letter words.
///
/// It is large enough to play and simulate with when no word file is at
/// hand, and it contains the default openers.
pub const SAMPLE: &[&str] = &[
    "about", "above", "abuse", "actor", "acute", "admit", "adopt", "adult", "after", "again",
    "agent", "agree", "ahead", "alarm", "album", "alert", "alike", "alive", "allow", "alone",
    "along", "alter", "among", "anger", "angle", "angry", "apart", "apple", "apply", "arena",
    "argue", "arise", "array", "aside", "asset", "audio", "audit", "avoid", "award", "aware",
    "badly", "baker", "bases", "basic", "beach", "began", "begin", "being", "below", "bench",
    "berry", "billy", "birth", "black", "blame", "blind", "block", "blood", "board", "boost",
    "booth", "bound", "brain", "brand", "bread", "break", "breed", "brief", "bring", "broad",
    "broke", "brown", "build", "built", "buyer", "cable", "calif", "carry", "catch", "cause",
    "caret", "chain", "chair", "chart", "chase", "cheap", "check", "chest", "chief", "child",
    "china", "chose", "civil", "claim", "class", "clean", "clear", "click", "clock", "close",
    "coach", "coast", "could", "count", "court", "cover", "craft", "crane", "crash", "crate",
    "cream", "crime", "cross", "crowd", "crown", "curve", "cycle", "daily", "dance", "dated",
    "dealt", "death", "debut", "delay", "depth", "doing", "doubt", "dozen", "draft", "drama",
    "drawn", "dream", "dress", "drill", "drink", "drive", "drove", "dying", "eager", "early",
    "earth", "eight", "elite", "empty", "enemy", "enjoy", "enter", "entry", "equal", "error",
    "event", "every", "exact", "exist", "extra", "faith", "false", "fault", "fiber", "field",
    "fifth", "fifty", "fight", "final", "first", "fixed", "flash", "fleet", "floor", "fluid",
    "focus", "force", "forth", "forty", "forum", "found", "frame", "frank", "fraud", "fresh",
    "front", "fruit", "fully", "funny", "giant", "given", "glass", "globe", "going", "grace",
    "grade", "grand", "grant", "grape", "grass", "great", "green", "gross", "group", "grown",
    "guard", "guess", "guest", "guide", "happy", "harry", "heart", "heavy", "hence", "henry",
    "horse", "hotel", "house", "human", "ideal", "image", "index", "inner", "input", "issue",
    "japan", "jimmy", "joint", "jones", "judge", "known", "label", "large", "laser", "later",
    "laugh", "layer", "learn", "lease", "least", "leave", "legal", "lemon", "level", "lewis",
    "light", "limit", "links", "lives", "local", "logic", "loose", "lolly", "lower", "lucky",
    "lunch", "lying", "magic", "major", "maker", "march", "maria", "match", "maybe", "mayor",
    "meant", "media", "melon", "metal", "might", "minor", "minus", "mixed", "model", "money",
    "month", "moral", "motor", "mount", "mouse", "mouth", "movie", "music", "needs", "never",
    "newly", "night", "noise", "north", "noted", "novel", "nurse", "occur", "ocean", "offer",
    "often", "order", "other", "ought", "paint", "panel", "paper", "party", "peace", "peach",
    "phase", "phone", "photo", "piece", "pilot", "pitch", "place", "plain", "plane", "plant",
    "plate", "point", "pound", "power", "press", "price", "pride", "prime", "print", "prior",
    "prize", "proof", "proud", "prove", "queen", "quick", "quiet", "quite", "radio", "raise",
    "range", "rapid", "ratio", "reach", "ready", "refer", "right", "rival", "river", "robin",
    "roger", "roman", "rough", "round", "route", "royal", "rural", "scale", "scene", "scope",
    "score", "sense", "serve", "seven", "shall", "shape", "share", "sharp", "sheet", "shelf",
    "shell", "shift", "shirt", "shock", "shoot", "short", "shown", "sight", "since", "sixth",
    "sixty", "sized", "skill", "slate", "sleep", "slide", "small", "smart", "smile", "smith",
    "smoke", "solid", "solve", "sorry", "sound", "south", "space", "spare", "speak", "speed",
    "spend", "spent", "split", "spoke", "sport", "staff", "stage", "stake", "stand", "start",
    "state", "steam", "steel", "stick", "still", "stock", "stone", "stood", "store", "storm",
    "story", "strip", "stuck", "study", "stuff", "style", "sugar", "suite", "super", "sweet",
    "table", "taken", "taste", "taxes", "teach", "teeth", "terry", "texas", "thank", "theft",
    "their", "theme", "there", "these", "thick", "thing", "think", "third", "those", "three",
    "threw", "throw", "tight", "times", "tired", "title", "today", "topic", "total", "touch",
    "tough", "tower", "trace", "track", "trade", "train", "treat", "trend", "trial", "tried",
    "tries", "truck", "truly", "trust", "truth", "twice", "under", "undue", "union", "unity",
    "until", "upper", "upset", "urban", "usage", "usual", "valid", "value", "video", "virus",
    "visit", "vital", "voice", "waste", "watch", "water", "wheel", "where", "which", "while",
    "white", "whole", "whose", "woman", "women", "world", "worry", "worse", "worst", "worth",
    "would", "wound", "write", "wrong", "wrote", "yield", "young", "youth",
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sample_is_well_formed() {
        let pool = WordPool::new(SAMPLE, 5).unwrap();
        assert_eq!(pool.len(), SAMPLE.len());
        for opener in ["crane", "slate", "trace", "crate", "caret"] {
            assert!(pool.index_of(opener).is_some(), "{} missing", opener);
        }
    }

    #[test]
    fn pool_rejects_any_malformed_entry() {
        assert_eq!(
            WordPool::new(["crane", "slat", "trace"], 5),
            Err(EpisodeError::MalformedWord {
                word: "slat".to_string(),
                expected: 5
            })
        );
    }

    #[test]
    fn pool_lookup_is_case_insensitive() {
        let pool = WordPool::new(["crane", "slate"], 5).unwrap();
        assert_eq!(pool.index_of("SLATE"), Some(1));
        assert_eq!(pool.index_of("trace"), None);
        assert_eq!(&*pool[0], "crane");
    }

    #[test]
    fn clones_share_storage() {
        let pool = WordPool::new(["crane"], 5).unwrap();
        let other = pool.clone();
        assert!(pool.shares(&other));
        assert!(!pool.shares(&WordPool::new(["crane"], 5).unwrap()));
    }

    #[test]
    fn common_words_normalize() {
        let common: CommonWords = [" Crane", "SLATE", ""].iter().collect();
        assert_eq!(common.len(), 2);
        assert!(common.contains("crane"));
        assert!(common.contains("slate"));
        assert!(CommonWords::new().is_empty());
    }
}
