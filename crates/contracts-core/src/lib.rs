//! contracts-core: Shared records, configuration, and error handling for contract graph search.
//!
//! This crate provides the foundational types used across the search components:
//! - Agreement, Party, and ContractClause records assembled from the graph
//! - The ClauseType catalog used to filter agreements
//! - Layered configuration (file + environment)
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::ContractsConfig;
pub use error::ContractsError;
pub use types::{Agreement, ClauseType, ContractClause, Party};
