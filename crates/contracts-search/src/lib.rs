//! contracts-search: Structured and semantic search over the contracts knowledge graph.
//!
//! Answers lookups by contract id and counterparty, filters agreements by
//! clause type, finds agreements through excerpt similarity, and answers
//! aggregation questions by letting a language model write Cypher against
//! a fixed schema description. Graph access goes through
//! [`contracts_graph::QueryExecutor`]; embeddings and text generation go
//! through the traits in [`capability`].

pub mod assembly;
pub mod capability;
pub mod error;
pub mod openai;
pub mod schema;
pub mod service;
pub mod text2cypher;

pub use capability::{CapabilityError, Embedder, LanguageModel, ResultItem, TextGenerator};
pub use error::SearchError;
pub use service::ContractSearchService;
pub use text2cypher::Text2CypherGenerator;
