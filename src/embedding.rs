//! Describes the embedded vectors and the pipeline producing them.
//!
//! The pipeline is :
//! 1. aggregation of overlap weights by target entity, giving a popularity for each entity.
//! 2. ranking of entities by decreasing popularity. The rank of an entity is its row in all matrices.
//! 3. construction of the sparse overlap matrix (row = target, column = source) and L1 normalization of rows
//!    to get a conditional probability matrix.
//! 4. truncated svd of the conditional probability matrix, and L2 normalization of projected rows.
//!
//! Each row of the embedding corresponds to an entity, in decreasing popularity.
//! An entity whose row of overlaps is null gets a null vector.

use indexmap::IndexSet;
use ndarray::{Array1, Array2, ArrayView1};

use crate::embedder::EmbedderT;
use crate::errors::EmbedError;
use crate::io::embeddedbson::EmbeddedBsonReload;
use crate::overlap::aggregate::aggregate_popularity;
use crate::overlap::indexation::EntityIndexation;
use crate::overlap::matrix::conditional_probability_matrix;
use crate::params::EmbedParams;
use crate::renormalize::dense_row_l2_normalization;
use crate::svd::randsvd::RandomizedSvd;
use crate::svd::{check_dimension, SvdReducerT};
use crate::tools::edge::EdgeRecord;

/// The result of the pipeline : the entity indexation and the unit norm embedded vectors.
#[derive(Clone, Debug)]
pub struct Embedding {
    /// entity names in rank order
    entities: IndexSet<String>,
    /// popularity of entities in rank order. Empty if reloaded from a dump
    popularity: Vec<f64>,
    /// array (n,d) with n number of entities, d dimension of embedding
    embedded: Array2<f64>,
    /// singular values of the conditional probability matrix. Empty if reloaded from a dump
    sigma: Array1<f64>,
} // end of Embedding

impl Embedding {
    pub(crate) fn new(
        entities: IndexSet<String>,
        popularity: Vec<f64>,
        embedded: Array2<f64>,
        sigma: Array1<f64>,
    ) -> Self {
        assert_eq!(entities.len(), embedded.nrows());
        Embedding {
            entities,
            popularity,
            embedded,
            sigma,
        }
    }

    /// dimension of vectors
    pub fn get_dimension(&self) -> usize {
        self.embedded.ncols()
    }

    /// number of entities
    pub fn get_nb_entities(&self) -> usize {
        self.embedded.nrows()
    }

    /// to retrieve the indexation
    pub fn get_entity_indexation(&self) -> &IndexSet<String> {
        &self.entities
    }

    /// the (n,d) array of embedded vectors
    pub fn get_embedded(&self) -> &Array2<f64> {
        &self.embedded
    }

    /// get rank of an entity
    pub fn get_entity_rank(&self, entity: &str) -> Option<usize> {
        self.entities.get_index_of(entity)
    }

    /// get entity given its rank
    pub fn get_entity(&self, rank: usize) -> Option<&String> {
        self.entities.get_index(rank)
    }

    /// vector of entity at rank
    pub fn get_embedded_entity(&self, rank: usize) -> ArrayView1<f64> {
        self.embedded.row(rank)
    }

    /// vector of entity given its name
    pub fn get_entity_vector(&self, entity: &str) -> Option<ArrayView1<f64>> {
        self.get_entity_rank(entity).map(|rank| self.embedded.row(rank))
    }

    /// popularity (sum of incoming overlaps) of entity at rank, if known
    pub fn get_popularity(&self, rank: usize) -> Option<f64> {
        self.popularity.get(rank).copied()
    }

    /// singular values found by the reduction (empty for a reloaded embedding)
    pub fn get_singular_values(&self) -> &Array1<f64> {
        &self.sigma
    }

    /// cosine distance between 2 entities. Distance to a null vector is 1.
    pub fn get_entity_distance(&self, entity1: &str, entity2: &str) -> Option<f64> {
        let v1 = self.get_entity_vector(entity1)?;
        let v2 = self.get_entity_vector(entity2)?;
        Some(cosine_distance(&v1, &v2))
    } // end of get_entity_distance

    /// consumes the embedding and returns the (entity, vector) pairs in rank order
    pub fn into_pairs(self) -> Vec<(String, Array1<f64>)> {
        let embedded = self.embedded;
        self.entities
            .into_iter()
            .enumerate()
            .map(|(rank, name)| (name, embedded.row(rank).to_owned()))
            .collect()
    } // end of into_pairs
} // end of impl Embedding

/// make an Embedding from data reloaded from a bson dump. The dump must contain the indexation
pub fn from_bson_reload(reload: EmbeddedBsonReload) -> Result<Embedding, anyhow::Error> {
    let (embedded, entities) = reload.into_parts();
    let entities = match entities {
        Some(entities) => entities,
        None => {
            return Err(anyhow::anyhow!("no entity indexation in bson dump"));
        }
    };
    if entities.len() != embedded.nrows() {
        return Err(anyhow::anyhow!(
            "indexation has {} entities, embedded data has {} vectors",
            entities.len(),
            embedded.nrows()
        ));
    }
    Ok(Embedding::new(entities, Vec::new(), embedded, Array1::zeros(0)))
} // end of from_bson_reload

fn cosine_distance(v1: &ArrayView1<f64>, v2: &ArrayView1<f64>) -> f64 {
    let norm1 = v1.dot(v1).sqrt();
    let norm2 = v2.dot(v2).sqrt();
    if norm1 > 0. && norm2 > 0. {
        1. - v1.dot(v2) / (norm1 * norm2)
    } else {
        1.
    }
}

/// runs the pipeline on edges with the randomized svd.
pub fn embed_overlaps(edges: &[EdgeRecord], params: &EmbedParams) -> Result<Embedding, EmbedError> {
    let reducer = RandomizedSvd::from_params(params);
    embed_overlaps_with(edges, params, &reducer)
} // end of embed_overlaps

/// runs the pipeline on edges with any svd backend.
/// On error nothing is returned but the error describing the first precondition not satisfied.
pub fn embed_overlaps_with(
    edges: &[EdgeRecord],
    params: &EmbedParams,
    reducer: &dyn SvdReducerT,
) -> Result<Embedding, EmbedError> {
    //
    log::info!("embed_overlaps nb edges : {}, params : {:?}", edges.len(), params);
    //
    let popularity = aggregate_popularity(edges)?;
    let indexation = EntityIndexation::new(&popularity, params.get_tie_break());
    drop(popularity);
    // the number of entities is known, no need to build the matrix if dimension is not compatible
    check_dimension(params.get_dimension(), indexation.len())?;
    let (prob_mat, _nb_isolated) = conditional_probability_matrix(edges, &indexation, params.get_unknown_policy())?;
    let reduced = reducer.reduce(&prob_mat, params.get_dimension(), params.get_seed())?;
    drop(prob_mat);
    //
    let mut embedded = reduced.projected;
    if embedded.dim() != (indexation.len(), params.get_dimension()) {
        return Err(EmbedError::Decomposition(format!(
            "reduction returned shape {:?}, expected ({}, {})",
            embedded.dim(),
            indexation.len(),
            params.get_dimension()
        )));
    }
    let nb_null = dense_row_l2_normalization(&mut embedded);
    log::info!(
        "embed_overlaps done, nb entities : {}, dimension : {}, nb null vectors : {}",
        embedded.nrows(),
        embedded.ncols(),
        nb_null
    );
    let (entities, popularity) = indexation.into_parts();
    Ok(Embedding::new(entities, popularity, embedded, reduced.sigma))
} // end of embed_overlaps_with

/// An embedder owning its edges and parameters.
pub struct OverlapEmbedder {
    edges: Vec<EdgeRecord>,
    params: EmbedParams,
} // end of OverlapEmbedder

impl OverlapEmbedder {
    pub fn new(edges: Vec<EdgeRecord>, params: EmbedParams) -> Self {
        OverlapEmbedder { edges, params }
    }

    pub fn get_params(&self) -> &EmbedParams {
        &self.params
    }

    pub fn get_nb_edges(&self) -> usize {
        self.edges.len()
    }
} // end of impl OverlapEmbedder

impl EmbedderT for OverlapEmbedder {
    fn embed(&mut self) -> Result<Embedding, EmbedError> {
        let res = embed_overlaps(&self.edges, &self.params);
        if let Err(e) = &res {
            log::error!("OverlapEmbedder embedding failed : {}", e);
        }
        res
    }
} // end of impl EmbedderT for OverlapEmbedder

// end of mod tests
