//! Aggregation of overlap weights by target entity.
//!
//! The popularity of an entity is the sum of the weights of all the edges having it as target.
//! The map keeps entities in order of their first appearance as a target.

use indexmap::IndexMap;

use crate::errors::EmbedError;
use crate::tools::edge::EdgeRecord;

/// entity name -> sum of incoming overlap weights, in first-seen order
pub type Popularity = IndexMap<String, f64, ahash::RandomState>;

/// sums weights by target entity.
/// Weights are checked first, a non finite or negative weight fails with EmbedError::InvalidInput.
/// A sum overflowing to infinity also fails with EmbedError::InvalidInput at the position of the edge
/// causing it. As a cell or a row sum of the overlap matrix is bounded by the popularity of its target,
/// they are then finite too.
pub fn aggregate_popularity(edges: &[EdgeRecord]) -> Result<Popularity, EmbedError> {
    crate::tools::edge::check_edges(edges)?;
    //
    let mut popularity = Popularity::with_capacity_and_hasher(edges.len() / 4 + 1, ahash::RandomState::new());
    for (i, edge) in edges.iter().enumerate() {
        match popularity.get_mut(&edge.target) {
            Some(sum) => {
                *sum += edge.weight;
                if !sum.is_finite() {
                    log::error!("aggregate_popularity overflow for entity {} at edge {}", edge.target, i);
                    return Err(EmbedError::invalid_input(
                        Some(i),
                        format!("sum of weights of entity {} overflows", edge.target),
                    ));
                }
            }
            None => {
                popularity.insert(edge.target.clone(), edge.weight);
            }
        }
    }
    log::info!(
        "aggregate_popularity nb edges : {}, nb target entities : {}",
        edges.len(),
        popularity.len()
    );
    Ok(popularity)
} // end of aggregate_popularity

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_popularity_sums() {
        log_init_test();
        //
        let edges = vec![
            EdgeRecord::new("B", "A", 10.),
            EdgeRecord::new("C", "A", 5.),
            EdgeRecord::new("C", "B", 3.),
            EdgeRecord::new("A", "B", 10.),
            EdgeRecord::new("B", "A", 1.5),
        ];
        let popularity = aggregate_popularity(&edges).unwrap();
        assert_eq!(popularity.len(), 2);
        // first seen order
        assert_eq!(popularity.get_index(0).unwrap().0, "A");
        assert!((popularity["A"] - 16.5).abs() < 1.0E-10);
        assert!((popularity["B"] - 13.).abs() < 1.0E-10);
        // C is never a target
        assert!(popularity.get("C").is_none());
    } // end of test_popularity_sums

    #[test]
    fn test_popularity_bad_weight() {
        log_init_test();
        //
        let edges = vec![EdgeRecord::new("B", "A", 10.), EdgeRecord::new("C", "A", -5.)];
        let res = aggregate_popularity(&edges);
        assert!(matches!(
            res,
            Err(EmbedError::InvalidInput {
                position: Some(1),
                ..
            })
        ));
    } // end of test_popularity_bad_weight

    #[test]
    fn test_popularity_overflow() {
        log_init_test();
        // each weight is finite, their sum is not
        let edges = vec![
            EdgeRecord::new("B", "A", 1.0E308),
            EdgeRecord::new("B", "A", 1.0E308),
            EdgeRecord::new("C", "A", 1.),
        ];
        let res = aggregate_popularity(&edges);
        assert!(matches!(
            res,
            Err(EmbedError::InvalidInput {
                position: Some(1),
                ..
            })
        ));
        // large but summable weights are fine
        let edges = vec![EdgeRecord::new("B", "A", 1.0E307), EdgeRecord::new("C", "A", 1.0E307)];
        let popularity = aggregate_popularity(&edges).unwrap();
        assert!(popularity["A"].is_finite());
    } // end of test_popularity_overflow
} // end of mod tests
