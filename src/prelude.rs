//! To ease access to most frequently items
//!

pub use crate::io::{csv::*, embeddedbson::*, output::*};

pub use crate::embedder::*;
pub use crate::embedding::*;
pub use crate::errors::EmbedError;
pub use crate::params::*;
pub use crate::tools::edge::*;

pub use crate::overlap::indexation::EntityIndexation;
pub use crate::svd::randsvd::RandomizedSvd;
pub use crate::svd::{ReducedMatrix, SvdReducerT};
