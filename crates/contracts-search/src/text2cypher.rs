//! Natural-language to Cypher translation.
//!
//! A language model writes a Cypher statement from the schema and the
//! question; the statement runs as-is through the query executor. Nothing
//! is validated here, so a malformed statement comes back as the
//! executor's syntax error.

use std::sync::Arc;

use async_trait::async_trait;

use contracts_graph::{QueryExecutor, Statement};

use crate::capability::{CapabilityError, LanguageModel, ResultItem, TextGenerator};
use crate::error::Result;

/// A worked question/Cypher pair included in the prompt.
#[derive(Debug, Clone)]
pub struct CypherExample {
    pub question: String,
    pub cypher: String,
}

/// [`TextGenerator`] that asks a language model for Cypher and executes it.
pub struct Text2CypherGenerator {
    llm: Arc<dyn LanguageModel>,
    executor: Arc<dyn QueryExecutor>,
    examples: Vec<CypherExample>,
}

impl Text2CypherGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            llm,
            executor,
            examples: Vec::new(),
        }
    }

    /// Add few-shot examples to the prompt.
    pub fn with_examples(mut self, examples: Vec<CypherExample>) -> Self {
        self.examples = examples;
        self
    }

    fn prompt(&self, schema: &str, question: &str) -> String {
        let mut prompt = String::from(
            "Task: Generate a Cypher statement for querying a Neo4j graph database from a user input.\n\n",
        );
        prompt.push_str("Schema:\n");
        prompt.push_str(schema.trim());
        prompt.push_str("\n\n");

        if !self.examples.is_empty() {
            prompt.push_str("Examples:\n");
            for example in &self.examples {
                prompt.push_str(&format!(
                    "Question: {}\nCypher: {}\n",
                    example.question, example.cypher
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str("Input:\n");
        prompt.push_str(question.trim());
        prompt.push_str(
            "\n\nUse only the node labels, relationship types, and properties listed in the schema.\n\
             Respond with the Cypher statement only, without explanations or code fences.\n\n\
             Cypher query:",
        );
        prompt
    }
}

#[async_trait]
impl TextGenerator for Text2CypherGenerator {
    async fn generate(&self, schema: &str, question: &str) -> Result<Vec<ResultItem>> {
        let reply = self.llm.complete(&self.prompt(schema, question)).await?;
        let cypher = extract_cypher(&reply)?;
        tracing::debug!(cypher = %cypher, "Generated Cypher");

        let rows = self
            .executor
            .execute(Statement::new("generated", cypher.clone()))
            .await?;

        let metadata = serde_json::json!({ "cypher": cypher });
        Ok(rows
            .into_iter()
            .map(|row| ResultItem {
                content: serde_json::Value::Object(row).to_string(),
                metadata: Some(metadata.clone()),
            })
            .collect())
    }
}

/// Pull the Cypher statement out of a model reply.
///
/// Models sometimes wrap the statement in a markdown fence or prefix it
/// with a `cypher` tag even when told not to.
pub fn extract_cypher(reply: &str) -> std::result::Result<String, CapabilityError> {
    let mut text = reply.trim();

    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        text = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
        text = text.trim_start();
        if has_prefix_ignore_case(text, "cypher") {
            text = &text[6..];
        }
    } else if has_prefix_ignore_case(text, "cypher:") {
        text = &text[7..];
    }

    let cypher = text.trim();
    if cypher.is_empty() {
        return Err(CapabilityError::InvalidResponse(
            "Model returned no Cypher statement".to_string(),
        ));
    }
    Ok(cypher.to_string())
}

fn has_prefix_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts_graph::{GraphError, Row};
    use serde_json::json;
    use std::sync::Mutex;

    use crate::error::SearchError;

    struct FixedModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for FixedModel {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, CapabilityError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct RecordingExecutor {
        rows: Vec<Row>,
        seen: Mutex<Vec<Statement>>,
    }

    #[async_trait]
    impl QueryExecutor for RecordingExecutor {
        async fn execute(&self, statement: Statement) -> std::result::Result<Vec<Row>, GraphError> {
            self.seen.lock().unwrap().push(statement);
            Ok(self.rows.clone())
        }
    }

    struct RejectingExecutor;

    #[async_trait]
    impl QueryExecutor for RejectingExecutor {
        async fn execute(&self, _statement: Statement) -> std::result::Result<Vec<Row>, GraphError> {
            Err(GraphError::QuerySyntax("Invalid input 'RETRUN'".to_string()))
        }
    }

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_extract_plain_statement() {
        let cypher = extract_cypher("  MATCH (a:Agreement) RETURN count(a)\n").unwrap();
        assert_eq!(cypher, "MATCH (a:Agreement) RETURN count(a)");
    }

    #[test]
    fn test_extract_fenced_statement() {
        let reply = "Here you go:\n```cypher\nMATCH (a:Agreement)\nRETURN a.name\n```\nDone.";
        assert_eq!(extract_cypher(reply).unwrap(), "MATCH (a:Agreement)\nRETURN a.name");
    }

    #[test]
    fn test_extract_tagged_statement() {
        assert_eq!(
            extract_cypher("Cypher: MATCH (n) RETURN n").unwrap(),
            "MATCH (n) RETURN n"
        );
    }

    #[test]
    fn test_extract_empty_reply_fails() {
        assert!(extract_cypher("   ").is_err());
        assert!(extract_cypher("```cypher\n```").is_err());
    }

    #[tokio::test]
    async fn test_generate_runs_extracted_cypher() {
        let llm = Arc::new(FixedModel::new(
            "```\nMATCH (a:Agreement) RETURN a.agreement_type AS t, count(*) AS n\n```",
        ));
        let executor = Arc::new(RecordingExecutor {
            rows: vec![
                row(json!({"t": "Distributor", "n": 4})),
                row(json!({"t": "Supply", "n": 2})),
            ],
            seen: Mutex::new(Vec::new()),
        });

        let generator = Text2CypherGenerator::new(llm.clone(), executor.clone());
        let items = generator
            .generate("Agreement {agreement_type: STRING}", "How many agreements per type?")
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        let first: serde_json::Value = serde_json::from_str(&items[0].content).unwrap();
        assert_eq!(first, json!({"t": "Distributor", "n": 4}));

        let seen = executor.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "generated");
        assert_eq!(
            seen[0].text,
            "MATCH (a:Agreement) RETURN a.agreement_type AS t, count(*) AS n"
        );

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Agreement {agreement_type: STRING}"));
        assert!(prompts[0].contains("How many agreements per type?"));
    }

    #[tokio::test]
    async fn test_prompt_includes_examples() {
        let llm = Arc::new(FixedModel::new("MATCH (n) RETURN n"));
        let executor = Arc::new(RecordingExecutor {
            rows: vec![],
            seen: Mutex::new(Vec::new()),
        });
        let generator = Text2CypherGenerator::new(llm.clone(), executor).with_examples(vec![
            CypherExample {
                question: "How many agreements?".to_string(),
                cypher: "MATCH (a:Agreement) RETURN count(a)".to_string(),
            },
        ]);

        generator.generate("schema", "q").await.unwrap();
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Question: How many agreements?"));
        assert!(prompts[0].contains("Cypher: MATCH (a:Agreement) RETURN count(a)"));
    }

    #[tokio::test]
    async fn test_malformed_generated_cypher_surfaces_syntax_error() {
        let llm = Arc::new(FixedModel::new("MATCH (a) RETRUN a"));
        let generator = Text2CypherGenerator::new(llm, Arc::new(RejectingExecutor));

        let err = generator.generate("schema", "anything").await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::Graph(GraphError::QuerySyntax(_))
        ));
    }
}
