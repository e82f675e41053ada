//! just an edge of the overlap dataset

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::EmbedError;

/// An overlap record. The overlap weight counts co-occurrences of source and target.
/// Rows of the overlap matrix are indexed by targets, columns by sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
} // end of EdgeRecord

impl EdgeRecord {
    pub fn new(source: &str, target: &str, weight: f64) -> Self {
        EdgeRecord {
            source: String::from(source),
            target: String::from(target),
            weight,
        }
    }

    /// a weight must be finite and non negative
    pub(crate) fn check_weight(&self, position: usize) -> Result<(), EmbedError> {
        if !self.weight.is_finite() {
            return Err(EmbedError::invalid_input(
                Some(position),
                format!("weight {} not finite for edge {} -> {}", self.weight, self.source, self.target),
            ));
        }
        if self.weight < 0. {
            return Err(EmbedError::invalid_input(
                Some(position),
                format!("negative weight {} for edge {} -> {}", self.weight, self.source, self.target),
            ));
        }
        Ok(())
    } // end of check_weight
} // end of impl EdgeRecord

/// checks all weights in parallel, returns the error of the first bad one in edge order
pub fn check_edges(edges: &[EdgeRecord]) -> Result<(), EmbedError> {
    let first_bad = edges
        .par_iter()
        .enumerate()
        .map(|(i, edge)| edge.check_weight(i))
        .find_first(|res| res.is_err());
    match first_bad {
        Some(res) => res,
        None => Ok(()),
    }
} // end of check_edges

// end of mod tests
