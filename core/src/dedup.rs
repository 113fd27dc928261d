use std::collections::BTreeSet;
use std::sync::Arc;

use crate::document::DocumentId;
use crate::server::SearchServer;

/// Remove documents whose word sets duplicate an earlier document's.
///
/// Ids are scanned in ascending order, so the lowest id of each duplicate
/// group survives. Term frequencies are ignored: two documents with the same
/// words in different proportions still count as duplicates. Returns the
/// removed ids.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocumentId> {
    let mut seen_word_sets: BTreeSet<BTreeSet<Arc<str>>> = BTreeSet::new();
    let mut duplicates = Vec::new();
    for document_id in server.ids() {
        let words: BTreeSet<Arc<str>> = server
            .word_frequencies(document_id)
            .keys()
            .cloned()
            .collect();
        if !seen_word_sets.insert(words) {
            duplicates.push(document_id);
        }
    }

    for &document_id in &duplicates {
        tracing::info!(document_id, "removing duplicate document");
        server.remove_document(document_id);
    }
    duplicates
}
