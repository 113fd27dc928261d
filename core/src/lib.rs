//! In-memory TF-IDF search engine.
//!
//! Documents are short texts indexed into an inverted index (word -> posting
//! list of term frequencies). Queries are sets of plus words (must appear)
//! and minus words (must not appear); results are ranked by TF-IDF relevance
//! and truncated to the top k. Retrieval, matching, and removal all come in
//! sequential and rayon-parallel flavors selected by [`ExecutionPolicy`].

pub mod batch;
pub mod concurrent_map;
pub mod dedup;
pub mod document;
pub mod error;
mod query;
pub mod request_queue;
pub mod server;
pub mod stop_words;
pub mod tokenizer;

// Because this crate is named `core`, it shadows the built-in `core` crate in
// the extern prelude of every crate that links it. Macro-generated paths like
// `::core::result::Result` (proptest, and other macro crates) then resolve
// here instead of the language's `core`. Mirror the handful of paths such
// macros rely on so they keep working.
pub use ::std::{column, concat, file, line, module_path, panic, stringify, write};
pub mod fmt {
    pub use ::std::fmt::*;
}
pub mod option {
    pub use ::std::option::Option;
}
pub mod result {
    pub use ::std::result::Result;
}

pub use batch::{process_queries, process_queries_joined};
pub use concurrent_map::ConcurrentMap;
pub use dedup::remove_duplicates;
pub use document::{Document, DocumentId, DocumentStatus};
pub use error::{Error, Result};
pub use request_queue::RequestQueue;
pub use server::{ExecutionPolicy, SearchServer, DEFAULT_RESULT_LIMIT, RELEVANCE_TOLERANCE};
pub use stop_words::StopWords;
