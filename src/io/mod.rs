//! io utilities : csv loading of overlaps and bson dump of embeddings

pub mod csv;

pub mod embeddedbson;

pub mod output;
