//! Error types for the contracts-search crate.

use thiserror::Error;

use crate::capability::CapabilityError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Graph error: {0}")]
    Graph(#[from] contracts_graph::GraphError),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
