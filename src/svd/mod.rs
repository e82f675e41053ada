//! Truncated svd of the conditional probability matrix.
//!
//! The reduction is hidden behind the trait [SvdReducerT] so that the pipeline does not depend on
//! the way the decomposition is computed. The provided implementation is a randomized svd
//! à la Halko-Martinsson-Tropp, see [RandomizedSvd](randsvd::RandomizedSvd).

pub mod randsvd;

use ndarray::{Array1, Array2};
use sprs::CsMat;

use crate::errors::EmbedError;

/// The result of a reduction.
#[derive(Clone, Debug)]
pub struct ReducedMatrix {
    /// (n, k) array. Row i is the projection of row i of the reduced matrix on the first k right singular vectors,
    /// i.e $U_{k} \Sigma_{k}$
    pub projected: Array2<f64>,
    /// the k largest singular values in decreasing order
    pub sigma: Array1<f64>,
} // end of ReducedMatrix

/// A backend computing a rank k approximation of a sparse matrix.
/// The result must be a function of (matrix, dimension, seed) only.
pub trait SvdReducerT {
    fn reduce(&self, mat: &CsMat<f64>, dimension: usize, seed: u64) -> Result<ReducedMatrix, EmbedError>;
} // end of trait SvdReducerT

/// a truncated svd of rank dimension requires 0 < dimension < nb_entities
pub fn check_dimension(dimension: usize, nb_entities: usize) -> Result<(), EmbedError> {
    if dimension == 0 {
        return Err(EmbedError::InvalidConfiguration(String::from(
            "dimension must be strictly positive",
        )));
    }
    if dimension >= nb_entities {
        log::error!(
            "asked dimension {} while there are only {} entities",
            dimension,
            nb_entities
        );
        return Err(EmbedError::InvalidConfiguration(format!(
            "dimension {} must be less than number of entities {}",
            dimension, nb_entities
        )));
    }
    Ok(())
} // end of check_dimension

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_check_dimension() {
        assert!(check_dimension(2, 3).is_ok());
        assert!(matches!(check_dimension(3, 3), Err(EmbedError::InvalidConfiguration(_))));
        assert!(matches!(check_dimension(500, 10), Err(EmbedError::InvalidConfiguration(_))));
        assert!(matches!(check_dimension(0, 10), Err(EmbedError::InvalidConfiguration(_))));
    }
} // end of mod tests
