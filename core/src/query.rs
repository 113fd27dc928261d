use crate::error::{check_no_control_chars, Error, Result};
use crate::stop_words::StopWords;
use crate::tokenizer::split_into_words;

/// Whether parsing deduplicates the word sets.
///
/// `Unique` is required for scoring, where a repeated plus word must not
/// double-count relevance. `KeepDuplicates` skips the sort-and-dedup pass and
/// exists for the parallel match path, whose any-minus-word check is
/// order-independent and does not care about repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WordAccounting {
    Unique,
    KeepDuplicates,
}

/// A parsed query: plus words must appear in a matching document, minus
/// words must not. Words borrow from the raw query text.
#[derive(Debug, Default)]
pub(crate) struct Query<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

impl<'a> Query<'a> {
    /// Parse raw query text.
    ///
    /// A leading `-` marks a minus word and is stripped. A bare `-` or a
    /// `--` prefix is [`Error::InvalidQuerySyntax`]; a control character in
    /// any token is [`Error::InvalidContent`]. Stop words are dropped from
    /// both sets.
    pub fn parse(text: &'a str, stop_words: &StopWords, accounting: WordAccounting) -> Result<Self> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            check_no_control_chars(word)?;
            if let Some(content) = word.strip_prefix('-') {
                if content.is_empty() || content.starts_with('-') {
                    return Err(Error::InvalidQuerySyntax(word.to_owned()));
                }
                if !stop_words.contains(content) {
                    query.minus_words.push(content);
                }
            } else if !stop_words.contains(word) {
                query.plus_words.push(word);
            }
        }
        if accounting == WordAccounting::Unique {
            dedup_words(&mut query.plus_words);
            dedup_words(&mut query.minus_words);
        }
        Ok(query)
    }
}

fn dedup_words(words: &mut Vec<&str>) {
    words.sort_unstable();
    words.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> StopWords {
        StopWords::from_text("in the").unwrap()
    }

    #[test]
    fn separates_plus_and_minus_words() {
        let query = Query::parse("white cat -dog", &stop_words(), WordAccounting::Unique).unwrap();
        assert_eq!(query.plus_words, ["cat", "white"]);
        assert_eq!(query.minus_words, ["dog"]);
    }

    #[test]
    fn stop_words_are_dropped_from_both_sets() {
        let query = Query::parse("cat in -the", &stop_words(), WordAccounting::Unique).unwrap();
        assert_eq!(query.plus_words, ["cat"]);
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn unique_mode_deduplicates() {
        let query =
            Query::parse("cat cat -dog -dog", &stop_words(), WordAccounting::Unique).unwrap();
        assert_eq!(query.plus_words, ["cat"]);
        assert_eq!(query.minus_words, ["dog"]);
    }

    #[test]
    fn keep_duplicates_mode_preserves_repeats() {
        let query =
            Query::parse("cat cat -dog", &stop_words(), WordAccounting::KeepDuplicates).unwrap();
        assert_eq!(query.plus_words, ["cat", "cat"]);
    }

    #[test]
    fn bare_and_double_minus_are_syntax_errors() {
        for raw in ["cat -", "cat --", "--tail"] {
            let err = Query::parse(raw, &stop_words(), WordAccounting::Unique).unwrap_err();
            assert!(matches!(err, Error::InvalidQuerySyntax(_)), "query {raw:?}");
        }
    }

    #[test]
    fn control_characters_are_invalid_content() {
        let err = Query::parse("ca\x11t", &stop_words(), WordAccounting::Unique).unwrap_err();
        assert!(matches!(err, Error::InvalidContent(_)));
    }
}
