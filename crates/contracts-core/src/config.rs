//! Configuration management for contract search.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (CONTRACTS__ prefix, `__` section separator)
//! 2. Config file (contracts.toml, prefix overridable)
//! 3. Defaults

use serde::Deserialize;

use crate::error::ContractsError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub llm: LlmSettings,
}

/// Neo4j connection and execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,

    /// Per-query execution budget in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

/// Retrieval tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Nearest excerpts returned by similarity search.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Vector index over `Excerpt.embedding`.
    #[serde(default = "default_excerpt_index")]
    pub excerpt_index: String,

    /// Full-text index over `Organization.name`.
    #[serde(default = "default_organization_index")]
    pub organization_index: String,
}

/// Embedding and chat completion provider settings.
///
/// Any OpenAI-compatible endpoint works (hosted, gateway, or local server).
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_query_timeout_ms() -> u64 {
    30_000
}

fn default_top_k() -> usize {
    3
}

fn default_excerpt_index() -> String {
    "excerpt_embedding".to_string()
}

fn default_organization_index() -> String {
    "organizationNameTextIndex".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_request_timeout_ms() -> u64 {
    60_000
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            excerpt_index: default_excerpt_index(),
            organization_index: default_organization_index(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ContractsConfig {
    /// Load configuration from `<file_prefix>.toml` (optional) layered under
    /// `CONTRACTS__SECTION__KEY` environment variables.
    pub fn load(file_prefix: &str) -> Result<Self, ContractsError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CONTRACTS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: ContractsConfig = cfg.try_deserialize()?;
        tracing::debug!(
            uri = %loaded.neo4j.uri,
            top_k = loaded.search.top_k,
            "Loaded contract search configuration"
        );
        Ok(loaded)
    }
}
