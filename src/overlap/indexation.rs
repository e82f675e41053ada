//! Ranks entities by decreasing popularity.
//!
//! The rank of an entity is its row (and column) in the overlap matrix and its position
//! in the embedding. Rank 0 is the most popular entity.

use indexmap::IndexSet;

use super::aggregate::Popularity;
use crate::params::TieBreak;
use crate::tools::orderingf::{decreasing_sort_nans_last, IndexedValue};

/// The bijection entity <-> rank, and popularity by rank.
#[derive(Clone, Debug)]
pub struct EntityIndexation {
    /// entities sorted by decreasing popularity. get_index_of gives the rank
    entities: IndexSet<String>,
    /// popularity[rank]
    popularity: Vec<f64>,
} // end of EntityIndexation

impl EntityIndexation {
    /// sorts entities by decreasing popularity, ties are resolved by tie_break
    pub fn new(popularity: &Popularity, tie_break: TieBreak) -> Self {
        let mut to_sort: Vec<IndexedValue<f64>> = popularity
            .values()
            .enumerate()
            .map(|(i, v)| IndexedValue::new(i, *v))
            .collect();
        // the map is in first seen order and sort_by is stable
        match tie_break {
            TieBreak::FirstSeen => {
                to_sort.sort_by(decreasing_sort_nans_last);
            }
            TieBreak::Lexicographic => {
                to_sort.sort_by(|a, b| {
                    decreasing_sort_nans_last(a, b).then_with(|| {
                        let name_a = popularity.get_index(a.0).map(|(k, _)| k);
                        let name_b = popularity.get_index(b.0).map(|(k, _)| k);
                        name_a.cmp(&name_b)
                    })
                });
            }
        }
        //
        let mut entities = IndexSet::<String>::with_capacity(to_sort.len());
        let mut sorted_popularity = Vec::<f64>::with_capacity(to_sort.len());
        for v in &to_sort {
            if let Some((name, _)) = popularity.get_index(v.0) {
                entities.insert(name.clone());
                sorted_popularity.push(v.1);
            }
        }
        if let Some(first) = entities.get_index(0) {
            log::debug!(
                "EntityIndexation most popular : {} with {:.3e}",
                first,
                sorted_popularity[0]
            );
        }
        EntityIndexation {
            entities,
            popularity: sorted_popularity,
        }
    } // end of new

    /// number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// rank of entity, None if entity never appeared as a target
    pub fn get_rank(&self, entity: &str) -> Option<usize> {
        self.entities.get_index_of(entity)
    }

    /// entity at rank
    pub fn get_entity(&self, rank: usize) -> Option<&String> {
        self.entities.get_index(rank)
    }

    /// popularity of entity at rank
    pub fn get_popularity(&self, rank: usize) -> Option<f64> {
        self.popularity.get(rank).copied()
    }

    /// entity names in rank order
    pub fn get_entities(&self) -> &IndexSet<String> {
        &self.entities
    }

    pub(crate) fn into_parts(self) -> (IndexSet<String>, Vec<f64>) {
        (self.entities, self.popularity)
    }
} // end of impl EntityIndexation

// end of mod tests
