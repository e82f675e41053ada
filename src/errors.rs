//! Errors raised by the embedding pipeline.
//!
//! The pipeline fails fast: the first violated precondition is returned and no partial
//! embedding is ever produced.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmbedError {
    /// a weight is malformed, not finite or negative.
    /// position is the rank of the record in the edge list (or the line in a csv file) when known
    #[error("invalid input at record {position:?} : {reason}")]
    InvalidInput {
        position: Option<usize>,
        reason: String,
    },

    /// an edge refers to an entity which never appears as a target, so it has no row
    #[error("unknown entity : {0}")]
    UnknownEntity(String),

    /// requested dimension not compatible with the number of entities
    #[error("invalid configuration : {0}")]
    InvalidConfiguration(String),

    /// a lapack factorization (qr or svd) of the reduction failed
    #[error("decomposition failed : {0}")]
    Decomposition(String),
} // end of EmbedError

impl EmbedError {
    pub(crate) fn invalid_input(position: Option<usize>, reason: impl Into<String>) -> Self {
        EmbedError::InvalidInput {
            position,
            reason: reason.into(),
        }
    }
} // end of impl EmbedError
