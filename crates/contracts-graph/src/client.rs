//! Neo4j connection management and the query execution boundary.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::de::DeserializeOwned;

use contracts_core::config::Neo4jSettings;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connectivity(String),

    #[error("Cypher syntax error: {0}")]
    QuerySyntax(String),

    #[error("Query exceeded its {budget_ms}ms execution budget")]
    Timeout { budget_ms: u64 },

    #[error("Neo4j query error: {0}")]
    Query(neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<neo4rs::Error> for GraphError {
    fn from(err: neo4rs::Error) -> Self {
        match err {
            neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
                Self::Connectivity(err.to_string())
            }
            other => {
                let message = other.to_string();
                if is_syntax_error(&message) {
                    Self::QuerySyntax(message)
                } else {
                    Self::Query(other)
                }
            }
        }
    }
}

/// Server-side codes look like `Neo.ClientError.Statement.SyntaxError`.
fn is_syntax_error(message: &str) -> bool {
    message.contains("SyntaxError")
}

/// One result row: output column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Float(f64),
    Text(String),
    Vector(Vec<f32>),
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Param {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<f32>> for Param {
    fn from(v: Vec<f32>) -> Self {
        Self::Vector(v)
    }
}

/// A parametrized Cypher statement.
///
/// `name` identifies the statement in logs; it never reaches the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub name: &'static str,
    pub text: String,
    pub params: Vec<(String, Param)>,
}

impl Statement {
    pub fn new(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Bind a parameter, replacing any earlier value under the same key.
    pub fn param(mut self, key: &str, value: impl Into<Param>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
        self
    }

    /// Look up a bound parameter.
    pub fn get_param(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn into_query(self) -> Query {
        let Statement { text, params, .. } = self;
        params
            .into_iter()
            .fold(neo4rs::query(&text), |q, (key, value)| match value {
                Param::Int(v) => q.param(&key, v),
                Param::Float(v) => q.param(&key, v),
                Param::Text(v) => q.param(&key, v),
                Param::Vector(v) => {
                    q.param(&key, v.into_iter().map(f64::from).collect::<Vec<f64>>())
                }
            })
    }
}

/// The execution boundary every search operation goes through.
///
/// Implementations run exactly one statement per call. They never retry
/// and never rewrite the statement.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, GraphError>;
}

/// Decode a single named column of a row.
///
/// A missing column decodes as `null`, so optional targets see `None`.
pub fn decode_column<T: DeserializeOwned>(row: &Row, column: &str) -> Result<T, GraphError> {
    let value = row.get(column).cloned().unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value)
        .map_err(|e| GraphError::Serialization(format!("Failed to decode column `{column}`: {e}")))
}

/// Decode a whole row into a record keyed by column names.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, GraphError> {
    serde_json::from_value(serde_json::Value::Object(row))
        .map_err(|e| GraphError::Serialization(format!("Failed to decode row: {e}")))
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
    pub query_timeout_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
            query_timeout_ms: settings.query_timeout_ms,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// The connection is acquired once and shared by every operation.
/// Clone is cheap (inner Arc). Concurrency guarantees are the driver's.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    query_timeout: Duration,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connectivity(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connectivity(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self {
            graph,
            query_timeout: Duration::from_millis(config.query_timeout_ms),
        })
    }

    /// Execute a write-only query (CREATE, MERGE, DELETE, SET).
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        bounded(self.query_timeout, async {
            self.graph.run(query).await?;
            Ok::<_, GraphError>(())
        })
        .await
    }

    /// Execute a read query and collect all rows.
    pub async fn query_rows(&self, query: Query) -> Result<Vec<neo4rs::Row>, GraphError> {
        bounded(self.query_timeout, async {
            let mut stream = self.graph.execute(query).await?;
            let mut rows = Vec::new();
            while let Some(row) = stream.next().await? {
                rows.push(row);
            }
            Ok::<_, GraphError>(rows)
        })
        .await
    }
}

/// Run `fut` within `budget`, failing with [`GraphError::Timeout`] when it
/// does not complete in time.
pub async fn bounded<T, F>(budget: Duration, fut: F) -> Result<T, GraphError>
where
    F: Future<Output = Result<T, GraphError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(GraphError::Timeout {
            budget_ms: budget.as_millis() as u64,
        }),
    }
}

#[async_trait]
impl QueryExecutor for GraphClient {
    async fn execute(&self, statement: Statement) -> Result<Vec<Row>, GraphError> {
        let name = statement.name;
        let rows = self.query_rows(statement.into_query()).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let record: Row = row.to().map_err(|e| {
                GraphError::Serialization(format!("Failed to decode `{name}` row: {e}"))
            })?;
            records.push(record);
        }

        tracing::debug!(statement = name, rows = records.len(), "Executed statement");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_param_rebinding_replaces_value() {
        let stmt = Statement::new("t", "RETURN $x")
            .param("x", 1_i64)
            .param("x", "two");
        assert_eq!(stmt.params.len(), 1);
        assert_eq!(stmt.get_param("x"), Some(&Param::Text("two".to_string())));
    }

    #[test]
    fn test_param_order_is_kept() {
        let stmt = Statement::new("t", "RETURN $a, $b")
            .param("b", 2_i64)
            .param("a", vec![0.5_f32, 1.0]);
        let keys: Vec<&str> = stmt.params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(stmt.get_param("a"), Some(&Param::Vector(vec![0.5, 1.0])));
    }

    #[test]
    fn test_decode_column() {
        let r = row(json!({"clause_type": "Non-Compete", "count": 3}));
        let ct: String = decode_column(&r, "clause_type").unwrap();
        assert_eq!(ct, "Non-Compete");
        let count: i64 = decode_column(&r, "count").unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_missing_column_decodes_as_none() {
        let r = row(json!({"a": 1}));
        let missing: Option<String> = decode_column(&r, "b").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_decode_column_type_mismatch() {
        let r = row(json!({"count": "three"}));
        let err = decode_column::<i64>(&r, "count").unwrap_err();
        assert!(matches!(err, GraphError::Serialization(msg) if msg.contains("count")));
    }

    #[test]
    fn test_connection_error_is_connectivity() {
        let err = GraphError::from(neo4rs::Error::ConnectionError);
        assert!(matches!(err, GraphError::Connectivity(_)));
    }

    #[test]
    fn test_syntax_error_detection() {
        assert!(is_syntax_error(
            "Neo.ClientError.Statement.SyntaxError: Invalid input 'RETRUN'"
        ));
        assert!(!is_syntax_error(
            "Neo.ClientError.Procedure.ProcedureNotFound: no such procedure"
        ));
    }

    #[tokio::test]
    async fn test_bounded_times_out_with_budget() {
        let result: Result<(), GraphError> =
            bounded(Duration::from_millis(20), std::future::pending()).await;
        assert!(matches!(result, Err(GraphError::Timeout { budget_ms: 20 })));
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let rows = bounded(Duration::from_secs(5), async { Ok::<_, GraphError>(vec![1, 2]) })
            .await
            .unwrap();
        assert_eq!(rows, vec![1, 2]);

        let err = bounded(Duration::from_secs(5), async {
            Err::<(), _>(GraphError::QuerySyntax("Invalid input".to_string()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, GraphError::QuerySyntax(_)));
    }

    #[test]
    fn test_graph_config_from_settings() {
        let settings = Neo4jSettings {
            uri: "bolt://graph:7687".to_string(),
            query_timeout_ms: 250,
            ..Default::default()
        };
        let config = GraphConfig::from(&settings);
        assert_eq!(config.uri, "bolt://graph:7687");
        assert_eq!(config.query_timeout_ms, 250);
        assert_eq!(config.user, "neo4j");
    }
}
