//! lib target
//!
//! Embeds entities (subreddits) described by directed weighted overlap counts
//! into a low dimensional space of unit norm vectors.

pub mod errors;

pub mod params;

pub mod tools;

pub mod overlap;

pub mod renormalize;

pub mod svd;

pub mod embedder;

pub mod embedding;

pub mod io;

pub mod prelude;
