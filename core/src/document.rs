use serde::{Deserialize, Serialize};

/// Document identifier. Signed so that callers passing a negative id get a
/// [`crate::Error::NegativeId`] instead of a silent wraparound.
pub type DocumentId = i32;

/// Moderation status of an indexed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// A ranked search result row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}
