use thiserror::Error;

use crate::document::DocumentId;

/// Validation failures surfaced synchronously at the offending call.
///
/// None of these are retried or recovered internally. A lookup miss on a
/// read-only operation is an empty result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("document id {0} is negative")]
    NegativeId(DocumentId),
    #[error("document id {0} already exists")]
    DuplicateId(DocumentId),
    #[error("document id {0} does not exist")]
    UnknownId(DocumentId),
    #[error("word {0:?} contains a control character")]
    InvalidContent(String),
    #[error("malformed minus word {0:?}")]
    InvalidQuerySyntax(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Words may not contain bytes below 0x20 anywhere they enter the engine:
/// stop words, document text, or query text.
pub(crate) fn check_no_control_chars(word: &str) -> Result<()> {
    if word.bytes().any(|byte| byte < 0x20) {
        return Err(Error::InvalidContent(word.to_owned()));
    }
    Ok(())
}
