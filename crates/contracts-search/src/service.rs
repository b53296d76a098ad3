//! The public search surface over the contracts graph.
//!
//! Every operation is single-shot: validate input, run one statement,
//! assemble records, return. Nothing is cached between calls and failures
//! come back unchanged without retries.

use std::sync::Arc;

use contracts_core::config::SearchSettings;
use contracts_core::{Agreement, ClauseType};
use contracts_graph::queries::{self, AgreementRow, ContractExcerptsRow, ContractRow, ExcerptHit};
use contracts_graph::{decode_column, decode_row, QueryExecutor, Statement};

use crate::assembly::{self, ClauseInput, Projection};
use crate::capability::{Embedder, TextGenerator};
use crate::error::{Result, SearchError};
use crate::schema::GRAPH_SCHEMA;

/// Contract lookups, filtered listings, similarity search, and
/// natural-language aggregation over one shared graph connection.
pub struct ContractSearchService {
    executor: Arc<dyn QueryExecutor>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    settings: SearchSettings,
}

impl ContractSearchService {
    /// Create a service with default search settings.
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            executor,
            embedder,
            generator,
            settings: SearchSettings::default(),
        }
    }

    /// Override top_k and index names.
    pub fn with_settings(mut self, settings: SearchSettings) -> Self {
        self.settings = settings;
        self
    }

    // ── Single Agreement Lookups ─────────────────────────────────

    /// Long-shape agreement with parties and clause types (no excerpts).
    ///
    /// Returns `None` when no agreement carries `contract_id`.
    pub async fn get_contract(&self, contract_id: i64) -> Result<Option<Agreement>> {
        let Some(row) = self
            .single_row(queries::contract_by_id(contract_id), contract_id)
            .await?
        else {
            return Ok(None);
        };

        let row: ContractRow = decode_row(row)?;
        let types = row
            .clause_types
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();

        Ok(Some(assembly::assemble(
            row.agreement,
            row.parties,
            Projection::Long(ClauseInput::Types(types)),
        )))
    }

    /// Long-shape agreement whose clauses carry their excerpts, grouped by
    /// clause type.
    ///
    /// Returns `None` when no agreement carries `contract_id`.
    pub async fn get_contract_excerpts(&self, contract_id: i64) -> Result<Option<Agreement>> {
        let Some(row) = self
            .single_row(queries::contract_excerpts(contract_id), contract_id)
            .await?
        else {
            return Ok(None);
        };

        let row: ContractExcerptsRow = decode_row(row)?;
        let by_type = assembly::group_excerpts(row.excerpts);

        Ok(Some(assembly::assemble(
            row.agreement,
            row.parties,
            Projection::Long(ClauseInput::Excerpts(by_type)),
        )))
    }

    // ── Agreement Listings ───────────────────────────────────────

    /// Short-shape agreements of the organization best matching
    /// `organization_name` in the full-text index.
    pub async fn get_contracts(&self, organization_name: &str) -> Result<Vec<Agreement>> {
        let name = organization_name.trim();
        if name.is_empty() {
            return Err(SearchError::InvalidInput(
                "organization name must not be empty".to_string(),
            ));
        }
        self.list_agreements(queries::contracts_by_organization(
            &self.settings.organization_index,
            name,
        ))
        .await
    }

    /// Short-shape agreements having at least one clause of `clause_type`.
    pub async fn get_contracts_with_clause_type(
        &self,
        clause_type: &ClauseType,
    ) -> Result<Vec<Agreement>> {
        self.list_agreements(queries::contracts_with_clause_type(clause_type.as_str()))
            .await
    }

    /// Short-shape agreements having no clause of `clause_type`.
    pub async fn get_contracts_without_clause(
        &self,
        clause_type: &ClauseType,
    ) -> Result<Vec<Agreement>> {
        self.list_agreements(queries::contracts_without_clause_type(clause_type.as_str()))
            .await
    }

    // ── Catalog ──────────────────────────────────────────────────

    /// Distinct clause types present in the graph, ascending.
    pub async fn get_contract_clause_types(&self) -> Result<Vec<String>> {
        let rows = self.executor.execute(queries::clause_types()).await?;

        let mut types = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(clause_type) = decode_column::<Option<String>>(row, "clause_type")? {
                types.push(clause_type);
            }
        }
        types.sort();
        types.dedup();
        Ok(types)
    }

    // ── Semantic Retrieval ───────────────────────────────────────

    /// Agreements owning the excerpts nearest to `text`, one partial record
    /// per hit in similarity order. Hits are neither re-scored nor merged.
    ///
    /// At most `top_k` hits are considered. A hit whose excerpt has no text
    /// is dropped without replacement, so fewer than `top_k` records may
    /// come back.
    pub async fn get_contracts_similar_text(&self, text: &str) -> Result<Vec<Agreement>> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidInput(
                "search text must not be empty".to_string(),
            ));
        }
        let top_k = self.settings.top_k;
        if top_k == 0 {
            return Err(SearchError::InvalidInput("top_k must be at least 1".to_string()));
        }

        let embedding = self.embedder.embed(text).await?;
        let rows = self
            .executor
            .execute(queries::similar_excerpts(
                &self.settings.excerpt_index,
                top_k,
                embedding,
            ))
            .await?;

        let mut agreements = Vec::with_capacity(rows.len().min(top_k));
        for row in rows.into_iter().take(top_k) {
            let hit: ExcerptHit = decode_row(row)?;
            if hit.excerpt.is_none() {
                tracing::warn!(contract_id = hit.contract_id, "Skipping hit without excerpt text");
                continue;
            }
            tracing::debug!(contract_id = hit.contract_id, score = hit.score, "Excerpt hit");
            agreements.push(assembly::partial_from_hit(hit));
        }
        Ok(agreements)
    }

    /// Answer an open-ended question by letting the text generator derive
    /// and run a query against the graph schema. Non-empty result contents
    /// are joined, each followed by a blank line.
    pub async fn answer_aggregation_question(&self, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(SearchError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let items = self.generator.generate(GRAPH_SCHEMA, question).await?;

        let mut answer = String::new();
        for item in items.iter().filter(|item| !item.content.is_empty()) {
            answer.push_str(&item.content);
            answer.push_str("\n\n");
        }
        Ok(answer)
    }

    // ── Helpers ──────────────────────────────────────────────────

    async fn list_agreements(&self, statement: Statement) -> Result<Vec<Agreement>> {
        let rows = self.executor.execute(statement).await?;

        let mut agreements = Vec::with_capacity(rows.len());
        for row in rows {
            let row: AgreementRow = decode_row(row)?;
            agreements.push(assembly::assemble(row.agreement, row.parties, Projection::Short));
        }
        Ok(agreements)
    }

    /// First row of a by-id lookup. More than one row means duplicate
    /// `contract_id` values in the graph; the first wins.
    async fn single_row(
        &self,
        statement: Statement,
        contract_id: i64,
    ) -> Result<Option<contracts_graph::Row>> {
        let rows = self.executor.execute(statement).await?;
        if rows.len() > 1 {
            tracing::warn!(
                contract_id,
                matches = rows.len(),
                "Multiple agreements share a contract_id; using the first"
            );
        }
        Ok(rows.into_iter().next())
    }
}
