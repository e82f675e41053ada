//! defines parameters of the overlap embedding

use serde::{Deserialize, Serialize};

/// dimension of embedded vectors if not specified
pub const DEFAULT_DIMENSION: usize = 500;

/// seed of the random generator used in the randomized svd if not specified
pub const DEFAULT_SEED: u64 = 1;

/// How entities with equal popularity are ordered in the indexation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// keep the order of first appearance of the entity as a target in the edge list
    FirstSeen,
    /// ascending byte order of the entity name
    Lexicographic,
} // end of TieBreak

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::FirstSeen
    }
}

/// What to do with an edge whose source entity never appears as a target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownEntityPolicy {
    /// fail with EmbedError::UnknownEntity
    Fail,
    /// discard the edge (a count of dropped edges is logged)
    Drop,
} // end of UnknownEntityPolicy

impl Default for UnknownEntityPolicy {
    fn default() -> Self {
        UnknownEntityPolicy::Fail
    }
}

/// Parameters of the pipeline.
/// The randomized svd is parametrized as in Halko-Martinsson-Tropp: the range of the matrix is
/// searched with dimension + oversampling random vectors, refined by nb_power_iter power iterations.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct EmbedParams {
    /// dimension of embedded vectors. Must be less than the number of entities
    pub dimension: usize,
    /// seed of the gaussian test matrix
    pub seed: u64,
    /// order of entities with equal popularity
    pub tie_break: TieBreak,
    /// what to do with edges whose source is never a target
    pub unknown_policy: UnknownEntityPolicy,
    /// number of power iterations in range approximation
    pub nb_power_iter: usize,
    /// number of random vectors added to dimension in range approximation
    pub oversampling: usize,
} // end of EmbedParams

impl EmbedParams {
    pub fn new(dimension: usize, seed: u64) -> Self {
        EmbedParams {
            dimension,
            seed,
            ..Default::default()
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_unknown_policy(mut self, policy: UnknownEntityPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub fn with_power_iter(mut self, nb_power_iter: usize) -> Self {
        self.nb_power_iter = nb_power_iter;
        self
    }

    pub fn with_oversampling(mut self, oversampling: usize) -> Self {
        self.oversampling = oversampling;
        self
    }

    /// get embedding dimension
    pub fn get_dimension(&self) -> usize {
        self.dimension
    }

    /// seed of the randomized svd
    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    pub fn get_tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn get_unknown_policy(&self) -> UnknownEntityPolicy {
        self.unknown_policy
    }

    ///
    pub fn get_nb_power_iter(&self) -> usize {
        self.nb_power_iter
    }

    pub fn get_oversampling(&self) -> usize {
        self.oversampling
    }
} // end of impl EmbedParams

impl Default for EmbedParams {
    fn default() -> Self {
        EmbedParams {
            dimension: DEFAULT_DIMENSION,
            seed: DEFAULT_SEED,
            tie_break: TieBreak::default(),
            unknown_policy: UnknownEntityPolicy::default(),
            nb_power_iter: 5,
            oversampling: 10,
        }
    }
} // end of impl Default for EmbedParams
