//! edge records and ordering helpers

pub mod edge;

pub mod orderingf;
