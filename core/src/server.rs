use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rayon::prelude::*;

use crate::concurrent_map::ConcurrentMap;
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::{check_no_control_chars, Error, Result};
use crate::query::{Query, WordAccounting};
use crate::stop_words::StopWords;
use crate::tokenizer::split_into_words;

/// Default top-k cutoff for [`SearchServer::find_top_documents`].
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Relevance scores closer than this are treated as ties and ordered by
/// rating instead.
pub const RELEVANCE_TOLERANCE: f64 = 1e-6;

/// How an operation distributes its per-word work: inline on the calling
/// thread, or fanned out over the rayon pool (joining before returning).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    #[default]
    Sequential,
    Parallel,
}

/// Indexed state of one document. `word_frequencies` shares its `Arc<str>`
/// keys with the inverted index, so a word is stored once no matter how many
/// documents contain it.
#[derive(Debug)]
struct DocumentData {
    word_frequencies: BTreeMap<Arc<str>, f64>,
    rating: i32,
    status: DocumentStatus,
}

static EMPTY_WORD_FREQUENCIES: BTreeMap<Arc<str>, f64> = BTreeMap::new();

/// An in-memory full-text index with TF-IDF ranked retrieval.
///
/// Writes (`add_document`, `remove_document*`) are single-writer: the caller
/// must not run them concurrently with each other or with any retrieval on
/// the same instance. The parallel retrieval paths only fan out read-only
/// work internally and are safe under that contract.
pub struct SearchServer {
    stop_words: StopWords,
    document_ids: BTreeSet<DocumentId>,
    documents: BTreeMap<DocumentId, DocumentData>,
    word_to_documents: BTreeMap<Arc<str>, BTreeMap<DocumentId, f64>>,
}

impl SearchServer {
    pub fn new(stop_words: StopWords) -> Self {
        Self {
            stop_words,
            document_ids: BTreeSet::new(),
            documents: BTreeMap::new(),
            word_to_documents: BTreeMap::new(),
        }
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.document_ids.iter().copied()
    }

    /// The document's word -> term-frequency map, or an empty map if the id
    /// is absent. A miss is a lookup result, not an error.
    pub fn word_frequencies(&self, document_id: DocumentId) -> &BTreeMap<Arc<str>, f64> {
        self.documents
            .get(&document_id)
            .map(|data| &data.word_frequencies)
            .unwrap_or(&EMPTY_WORD_FREQUENCIES)
    }

    /// Tokenize and index a document.
    ///
    /// All validation happens before any mutation, so a failed call leaves
    /// the server untouched. Errors: [`Error::NegativeId`],
    /// [`Error::DuplicateId`], [`Error::InvalidContent`].
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 {
            return Err(Error::NegativeId(document_id));
        }
        if self.documents.contains_key(&document_id) {
            return Err(Error::DuplicateId(document_id));
        }
        let words = split_into_words(text);
        for word in &words {
            check_no_control_chars(word)?;
        }

        let words: Vec<&str> = words
            .into_iter()
            .filter(|word| !self.stop_words.contains(word))
            .collect();
        let mut data = DocumentData {
            word_frequencies: BTreeMap::new(),
            rating: compute_average_rating(ratings),
            status,
        };
        if !words.is_empty() {
            let tf_per_occurrence = 1.0 / words.len() as f64;
            for word in words {
                let interned = self.intern(word);
                *self
                    .word_to_documents
                    .entry(Arc::clone(&interned))
                    .or_default()
                    .entry(document_id)
                    .or_insert(0.0) += tf_per_occurrence;
                *data.word_frequencies.entry(interned).or_insert(0.0) += tf_per_occurrence;
            }
        }
        self.documents.insert(document_id, data);
        self.document_ids.insert(document_id);
        tracing::debug!(document_id, "document indexed");
        Ok(())
    }

    /// Remove a document and all its postings. No-op if the id is absent.
    pub fn remove_document(&mut self, document_id: DocumentId) {
        self.remove_document_with(ExecutionPolicy::Sequential, document_id);
    }

    /// [`Self::remove_document`] with an explicit execution policy. The
    /// parallel variant partitions the posting-list removals across rayon
    /// workers; postings for distinct words are disjoint, so no cross-word
    /// locking is needed.
    pub fn remove_document_with(&mut self, policy: ExecutionPolicy, document_id: DocumentId) {
        let Some(data) = self.documents.remove(&document_id) else {
            return;
        };
        self.document_ids.remove(&document_id);

        match policy {
            ExecutionPolicy::Sequential => {
                for word in data.word_frequencies.keys() {
                    let emptied = match self.word_to_documents.get_mut(word.as_ref()) {
                        Some(postings) => {
                            postings.remove(&document_id);
                            postings.is_empty()
                        }
                        None => false,
                    };
                    if emptied {
                        self.word_to_documents.remove(word.as_ref());
                    }
                }
            }
            ExecutionPolicy::Parallel => {
                let posting_lists: Vec<&mut BTreeMap<DocumentId, f64>> = self
                    .word_to_documents
                    .iter_mut()
                    .filter_map(|(word, postings)| {
                        data.word_frequencies
                            .contains_key(word.as_ref())
                            .then_some(postings)
                    })
                    .collect();
                posting_lists.into_par_iter().for_each(|postings| {
                    postings.remove(&document_id);
                });
                // Emptied entries are dropped eagerly, same as the sequential path.
                for word in data.word_frequencies.keys() {
                    if self
                        .word_to_documents
                        .get(word.as_ref())
                        .is_some_and(BTreeMap::is_empty)
                    {
                        self.word_to_documents.remove(word.as_ref());
                    }
                }
            }
        }
        tracing::debug!(document_id, "document removed");
    }

    /// Top documents with status [`DocumentStatus::Actual`], sequential,
    /// default cutoff.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Top documents with an exact status, sequential, default cutoff.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        document_status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(
            ExecutionPolicy::Sequential,
            raw_query,
            DEFAULT_RESULT_LIMIT,
            move |_, status, _| status == document_status,
        )
    }

    /// The general ranked-retrieval form: explicit execution policy, result
    /// cutoff, and caller predicate over `(id, status, rating)`.
    ///
    /// Scoring accumulates `tf * idf` per plus word with `idf = ln(N / n)`;
    /// a minus word excludes a document unconditionally, and the predicate
    /// is never consulted for documents a minus word excludes. Results are
    /// sorted by relevance descending, ties within [`RELEVANCE_TOLERANCE`]
    /// by rating descending, then truncated to `limit`.
    pub fn find_top_documents_by<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        limit: usize,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words, WordAccounting::Unique)?;
        let relevance_by_document = match policy {
            ExecutionPolicy::Sequential => self.find_all_documents(&query, &predicate),
            ExecutionPolicy::Parallel => self.find_all_documents_parallel(&query, &predicate),
        };

        let mut results: Vec<Document> = relevance_by_document
            .into_iter()
            .filter_map(|(document_id, relevance)| {
                self.documents
                    .get(&document_id)
                    .map(|data| Document::new(document_id, relevance, data.rating))
            })
            .collect();
        results.sort_unstable_by(|lhs, rhs| {
            if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_TOLERANCE {
                rhs.rating.cmp(&lhs.rating)
            } else {
                rhs.relevance
                    .partial_cmp(&lhs.relevance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }
        });
        results.truncate(limit);
        Ok(results)
    }

    /// Which plus words of `raw_query` the document contains, sorted and
    /// deduplicated, plus the document's status. Any matching minus word
    /// empties the list (not an error).
    ///
    /// Errors: [`Error::NegativeId`], [`Error::UnknownId`], parser errors.
    pub fn match_document(
        &self,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<Arc<str>>, DocumentStatus)> {
        self.match_document_with(ExecutionPolicy::Sequential, raw_query, document_id)
    }

    /// [`Self::match_document`] with an explicit execution policy. The
    /// parallel variant keeps query duplicates and runs an order-independent
    /// any-minus-word check before collecting plus words.
    pub fn match_document_with(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        document_id: DocumentId,
    ) -> Result<(Vec<Arc<str>>, DocumentStatus)> {
        if document_id < 0 {
            return Err(Error::NegativeId(document_id));
        }
        let data = self
            .documents
            .get(&document_id)
            .ok_or(Error::UnknownId(document_id))?;

        match policy {
            ExecutionPolicy::Sequential => {
                let query = Query::parse(raw_query, &self.stop_words, WordAccounting::Unique)?;
                for word in &query.minus_words {
                    if data.word_frequencies.contains_key(*word) {
                        return Ok((Vec::new(), data.status));
                    }
                }
                let matched = query
                    .plus_words
                    .iter()
                    .filter_map(|word| intern_from(&data.word_frequencies, word))
                    .collect();
                Ok((matched, data.status))
            }
            ExecutionPolicy::Parallel => {
                let query =
                    Query::parse(raw_query, &self.stop_words, WordAccounting::KeepDuplicates)?;
                if query
                    .minus_words
                    .par_iter()
                    .any(|word| data.word_frequencies.contains_key(*word))
                {
                    return Ok((Vec::new(), data.status));
                }
                let mut matched: Vec<&str> = query
                    .plus_words
                    .par_iter()
                    .copied()
                    .filter(|word| data.word_frequencies.contains_key(*word))
                    .collect();
                matched.sort_unstable();
                matched.dedup();
                let matched = matched
                    .into_iter()
                    .filter_map(|word| intern_from(&data.word_frequencies, word))
                    .collect();
                Ok((matched, data.status))
            }
        }
    }

    /// Reuse the index's key for `word` when one exists, so the per-document
    /// map shares the same allocation.
    fn intern(&self, word: &str) -> Arc<str> {
        match self.word_to_documents.get_key_value(word) {
            Some((existing, _)) => Arc::clone(existing),
            None => Arc::from(word),
        }
    }

    fn inverse_document_frequency(&self, documents_with_word: usize) -> f64 {
        (self.documents.len() as f64 / documents_with_word as f64).ln()
    }

    fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocumentId, f64>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        // Minus words first, so the predicate is never called for a document
        // that is excluded anyway.
        let mut excluded = BTreeSet::new();
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_documents.get(*word) {
                excluded.extend(postings.keys().copied());
            }
        }

        let mut relevance_by_document = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_documents.get(*word) else {
                continue;
            };
            let idf = self.inverse_document_frequency(postings.len());
            for (&document_id, &term_frequency) in postings {
                if excluded.contains(&document_id) {
                    continue;
                }
                let Some(data) = self.documents.get(&document_id) else {
                    continue;
                };
                if predicate(document_id, data.status, data.rating) {
                    *relevance_by_document.entry(document_id).or_insert(0.0) +=
                        term_frequency * idf;
                }
            }
        }
        relevance_by_document
    }

    fn find_all_documents_parallel<P>(
        &self,
        query: &Query<'_>,
        predicate: &P,
    ) -> BTreeMap<DocumentId, f64>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let accumulator: ConcurrentMap<f64> = ConcurrentMap::new(rayon::current_num_threads());

        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_documents.get(*word) else {
                return;
            };
            let idf = self.inverse_document_frequency(postings.len());
            for (&document_id, &term_frequency) in postings {
                let Some(data) = self.documents.get(&document_id) else {
                    continue;
                };
                if predicate(document_id, data.status, data.rating) {
                    accumulator.update(document_id, |relevance| {
                        *relevance += term_frequency * idf;
                    });
                }
            }
        });

        // The plus fan-out has joined by now; erasure after accumulation is
        // equivalent to the sequential exclusion set.
        query.minus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_documents.get(*word) else {
                return;
            };
            for &document_id in postings.keys() {
                accumulator.erase(document_id);
            }
        });

        accumulator.into_ordinary_map()
    }
}

/// Arithmetic mean truncated toward zero; 0 for an empty list.
fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    ratings.iter().sum::<i32>() / ratings.len() as i32
}

fn intern_from(frequencies: &BTreeMap<Arc<str>, f64>, word: &str) -> Option<Arc<str>> {
    frequencies
        .get_key_value(word)
        .map(|(interned, _)| Arc::clone(interned))
}
