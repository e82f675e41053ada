//! describes embedder trait to be able to manipulate embedder in a somewhat unified way

use crate::embedding::Embedding;
use crate::errors::EmbedError;

/// The trait Embedder is something that has as output an [Embedding].
/// The computation is a pure function of the data and parameters owned by the embedder,
/// so calling embed twice gives the same result.
pub trait EmbedderT {
    ///
    fn embed(&mut self) -> Result<Embedding, EmbedError>;
} // end of trait EmbedderT
