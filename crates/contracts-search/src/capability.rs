//! Pluggable external capabilities: embeddings and text generation.
//!
//! The search core only sees these traits, so any provider (or a stub in
//! tests) can stand behind them.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::error::Result;

/// Errors from embedding or text generation providers.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CapabilityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Turns text into a fixed-length vector comparable with excerpt embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, CapabilityError>;
}

/// Single-turn text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CapabilityError>;
}

/// One result produced by a [`TextGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultItem {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ResultItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
        }
    }
}

/// Answers a question against a described graph schema.
///
/// Implementations derive a query from the schema and question, run it,
/// and return the results as text items.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, schema: &str, question: &str) -> Result<Vec<ResultItem>>;
}
