//! From overlap edges to the conditional probability matrix.
//!
//! Entities are ranked by decreasing popularity (sum of overlap weights received as target),
//! the rank is the row and column index of the entity in the matrix.

pub mod aggregate;

pub mod indexation;

pub mod matrix;
