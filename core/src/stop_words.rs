use std::collections::BTreeSet;

use crate::error::{check_no_control_chars, Result};
use crate::tokenizer::split_into_words;

/// An immutable set of words excluded from both indexing and querying.
///
/// Fixed at construction. Membership never raises an error by itself; the
/// only failure mode is a control character inside a stop word, rejected up
/// front with [`crate::Error::InvalidContent`].
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build from any word collection. Empty strings are skipped.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.into();
            if word.is_empty() {
                continue;
            }
            check_no_control_chars(&word)?;
            set.insert(word);
        }
        Ok(Self { words: set })
    }

    /// Build from a space-separated word list, e.g. `"in the"`.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn membership_after_construction() {
        let stop_words = StopWords::from_text("in the").unwrap();
        assert!(stop_words.contains("in"));
        assert!(stop_words.contains("the"));
        assert!(!stop_words.contains("cat"));
    }

    #[test]
    fn empty_words_are_skipped() {
        let stop_words = StopWords::new(["", "in"]).unwrap();
        assert!(stop_words.contains("in"));
        assert!(!stop_words.contains(""));
    }

    #[test]
    fn control_characters_are_rejected() {
        let err = StopWords::from_text("in \x12the").unwrap_err();
        assert_eq!(err, Error::InvalidContent("\x12the".to_owned()));
        assert!(StopWords::new(["in", "\x12the"]).is_err());
    }
}
