use core::{DocumentStatus, SearchServer, StopWords};

use proptest::collection::vec;
use proptest::prelude::*;

proptest! {
    // Term frequencies of a non-empty document always sum to 1.
    #[test]
    fn term_frequencies_sum_to_one(words in vec("[a-z]{1,8}", 1..40)) {
        let mut server = SearchServer::new(StopWords::default());
        server
            .add_document(0, &words.join(" "), DocumentStatus::Actual, &[1])
            .unwrap();
        let total: f64 = server.word_frequencies(0).values().sum();
        prop_assert!((total - 1.0).abs() < 1e-6, "sum was {total}");
    }

    // Adding then removing any document batch restores the empty state.
    #[test]
    fn add_then_remove_roundtrip(texts in vec("[a-z]{1,6}( [a-z]{1,6}){0,10}", 1..10)) {
        let mut server = SearchServer::new(StopWords::from_text("a the").unwrap());
        for (id, text) in texts.iter().enumerate() {
            server
                .add_document(id as i32, text, DocumentStatus::Actual, &[1])
                .unwrap();
        }
        for id in 0..texts.len() {
            server.remove_document(id as i32);
        }
        prop_assert_eq!(server.document_count(), 0);
        prop_assert!(server.word_frequencies(0).is_empty());
    }

    // No query returns more than the default cutoff, and a minus word never
    // lets a document through.
    #[test]
    fn minus_word_always_excludes(word in "[a-z]{1,8}", ids in vec(0i32..100, 1..20)) {
        let mut server = SearchServer::new(StopWords::default());
        for id in &ids {
            let text = format!("{word} filler{id}");
            let _ = server.add_document(*id, &text, DocumentStatus::Actual, &[1]);
        }
        let query = format!("{word} -{word}");
        let found = server.find_top_documents(&query).unwrap();
        prop_assert!(found.is_empty());

        let found = server.find_top_documents(&word).unwrap();
        prop_assert!(found.len() <= core::DEFAULT_RESULT_LIMIT);
    }
}
