//! Construction of the conditional probability matrix.
//!
//! The overlap matrix has a row for each target entity and a column for each source entity,
//! both addressed by the rank in [EntityIndexation]. Repeated pairs are summed.
//! Rows are then L1 normalized so that row i is the distribution of sources conditioned on target i.

use std::time::SystemTime;

use cpu_time::ProcessTime;
use sprs::{CsMat, TriMatI};

use super::indexation::EntityIndexation;
use crate::errors::EmbedError;
use crate::params::UnknownEntityPolicy;
use crate::renormalize::csr_row_normalization;
use crate::tools::edge::EdgeRecord;

/// builds the (unnormalized) overlap matrix in compressed row storage.
pub fn overlap_matrix(
    edges: &[EdgeRecord],
    indexation: &EntityIndexation,
    policy: UnknownEntityPolicy,
) -> Result<CsMat<f64>, EmbedError> {
    //
    let nb_entities = indexation.len();
    let mut trimat = TriMatI::<f64, usize>::with_capacity((nb_entities, nb_entities), edges.len());
    let mut nb_dropped = 0usize;
    for edge in edges {
        let row = indexation.get_rank(&edge.target);
        let col = indexation.get_rank(&edge.source);
        match (row, col, policy) {
            (Some(i), Some(j), _) => {
                trimat.add_triplet(i, j, edge.weight);
            }
            (_, _, UnknownEntityPolicy::Drop) => {
                log::trace!("dropping edge {} -> {}", edge.source, edge.target);
                nb_dropped += 1;
            }
            (None, _, UnknownEntityPolicy::Fail) => {
                return Err(EmbedError::UnknownEntity(edge.target.clone()));
            }
            (_, None, UnknownEntityPolicy::Fail) => {
                log::error!("overlap_matrix source entity {} has no rank", edge.source);
                return Err(EmbedError::UnknownEntity(edge.source.clone()));
            }
        }
    }
    if nb_dropped > 0 {
        log::warn!(
            "overlap_matrix dropped {} edges with a source never seen as target",
            nb_dropped
        );
    }
    // duplicates (row, col) are summed in conversion
    let csr_mat: CsMat<f64> = trimat.to_csr();
    log::info!(
        "overlap_matrix nb entities : {}, nb edges : {}, nnz : {}",
        nb_entities,
        edges.len(),
        csr_mat.nnz()
    );
    Ok(csr_mat)
} // end of overlap_matrix

/// builds the overlap matrix and normalizes its rows to get conditional probabilities.
/// Returns the matrix and the number of null (isolated) rows
pub fn conditional_probability_matrix(
    edges: &[EdgeRecord],
    indexation: &EntityIndexation,
    policy: UnknownEntityPolicy,
) -> Result<(CsMat<f64>, usize), EmbedError> {
    let cpu_start = ProcessTime::now();
    let sys_start = SystemTime::now();
    //
    let mut csr_mat = overlap_matrix(edges, indexation, policy)?;
    let nb_null = csr_row_normalization(&mut csr_mat);
    if nb_null > 0 {
        log::info!("conditional_probability_matrix nb isolated entities : {}", nb_null);
    }
    //
    log::info!(
        "conditional_probability_matrix sys time(ms) {:?} cpu time(ms) {:?}",
        sys_start.elapsed().map(|t| t.as_millis()).unwrap_or(0),
        cpu_start.elapsed().as_millis()
    );
    Ok((csr_mat, nb_null))
} // end of conditional_probability_matrix

// end of mod tests
