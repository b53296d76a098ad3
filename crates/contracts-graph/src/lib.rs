//! Contracts Graph: Neo4j query execution for the contracts knowledge graph.
//!
//! This crate is the single access path to the graph. Every read flows
//! through the [`QueryExecutor`] boundary, which runs one parametrized
//! Cypher statement and returns its rows as named JSON columns. The
//! statement catalog in [`queries`] holds the traversal for each query mode.

pub mod client;
pub mod queries;

pub use client::{
    bounded, decode_column, decode_row, GraphClient, GraphConfig, GraphError, Param, QueryExecutor,
    Row, Statement,
};
