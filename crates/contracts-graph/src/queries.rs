//! Cypher statement catalog and the row records each statement yields.
//!
//! Party data is projected as one map per party (name, role, country,
//! state) instead of four parallel collections, so a party can never be
//! stitched together from mismatched positions.

use serde::Deserialize;

use contracts_core::Party;

use crate::client::Statement;

/// Agreement properties shared by every agreement-returning statement.
const AGREEMENT_PROJECTION: &str = "a {
           .contract_id, .name, .agreement_type,
           .effective_date, .expiration_date, .renewal_term
         } AS agreement";

/// One composite record per party relationship of agreement `a`.
const PARTY_PROJECTION: &str =
    "[(country:Country)-[i:INCORPORATED_IN]-(p:Organization)-[r:IS_PARTY_TO]-(a) | {
           name: p.name,
           role: r.role,
           incorporation_country: country.name,
           incorporation_state: i.state
         }] AS parties";

// ── Row Records ──────────────────────────────────────────────────

/// Agreement properties as projected by [`AGREEMENT_PROJECTION`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgreementNode {
    pub contract_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub agreement_type: Option<String>,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub renewal_term: Option<String>,
}

/// Row shape of the agreement-listing statements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgreementRow {
    pub agreement: AgreementNode,
    #[serde(default)]
    pub parties: Vec<Party>,
}

/// Row shape of [`contract_by_id`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractRow {
    pub agreement: AgreementNode,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub clause_types: Vec<Option<String>>,
}

/// One excerpt reachable from an agreement, tagged with its clause type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExcerptRecord {
    pub clause_type: Option<String>,
    pub text: Option<String>,
}

/// Row shape of [`contract_excerpts`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractExcerptsRow {
    pub agreement: AgreementNode,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub excerpts: Vec<ExcerptRecord>,
}

/// Row shape of [`similar_excerpts`]: one vector index hit traversed back
/// to its clause and agreement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExcerptHit {
    pub contract_id: i64,
    #[serde(default)]
    pub agreement_name: Option<String>,
    #[serde(default)]
    pub clause_type: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub score: f64,
}

// ── Single Agreement Lookups ─────────────────────────────────────

/// An agreement by id, with its parties and the type of every clause.
pub fn contract_by_id(contract_id: i64) -> Statement {
    let cypher = format!(
        "MATCH (a:Agreement {{contract_id: $contract_id}})
         RETURN {AGREEMENT_PROJECTION},
                {PARTY_PROJECTION},
                [(a)-[:HAS_CLAUSE]->(cc:ContractClause) | cc.type] AS clause_types"
    );
    Statement::new("contract_by_id", cypher).param("contract_id", contract_id)
}

/// An agreement by id, with every excerpt tagged by its clause type.
pub fn contract_excerpts(contract_id: i64) -> Statement {
    let cypher = format!(
        "MATCH (a:Agreement {{contract_id: $contract_id}})
         RETURN {AGREEMENT_PROJECTION},
                {PARTY_PROJECTION},
                [(a)-[:HAS_CLAUSE]->(cc:ContractClause)-[:HAS_EXCERPT]->(e:Excerpt) |
                   {{clause_type: cc.type, text: e.text}}] AS excerpts"
    );
    Statement::new("contract_excerpts", cypher).param("contract_id", contract_id)
}

// ── Agreement Listings ───────────────────────────────────────────

/// Agreements of the single best full-text match on organization name.
pub fn contracts_by_organization(index_name: &str, organization_name: &str) -> Statement {
    let cypher = format!(
        "CALL db.index.fulltext.queryNodes($index_name, $organization_name)
         YIELD node AS o, score
         WITH o, score
         ORDER BY score DESC
         LIMIT 1
         MATCH (o)-[:IS_PARTY_TO]->(a:Agreement)
         WITH DISTINCT a
         RETURN {AGREEMENT_PROJECTION},
                {PARTY_PROJECTION}"
    );
    Statement::new("contracts_by_organization", cypher)
        .param("index_name", index_name)
        .param("organization_name", organization_name)
}

/// Agreements with at least one clause of the given type.
pub fn contracts_with_clause_type(clause_type: &str) -> Statement {
    let cypher = format!(
        "MATCH (a:Agreement)-[:HAS_CLAUSE]->(:ContractClause {{type: $clause_type}})
         WITH DISTINCT a
         RETURN {AGREEMENT_PROJECTION},
                {PARTY_PROJECTION}"
    );
    Statement::new("contracts_with_clause_type", cypher).param("clause_type", clause_type)
}

/// Agreements with no clause of the given type. Other clause types on the
/// same agreement do not matter.
pub fn contracts_without_clause_type(clause_type: &str) -> Statement {
    let cypher = format!(
        "MATCH (a:Agreement)
         OPTIONAL MATCH (a)-[:HAS_CLAUSE]->(cc:ContractClause {{type: $clause_type}})
         WITH a, cc
         WHERE cc IS NULL
         RETURN {AGREEMENT_PROJECTION},
                {PARTY_PROJECTION}"
    );
    Statement::new("contracts_without_clause_type", cypher).param("clause_type", clause_type)
}

// ── Catalog ──────────────────────────────────────────────────────

/// Distinct clause types, ascending.
pub fn clause_types() -> Statement {
    Statement::new(
        "clause_types",
        "MATCH (cc:ContractClause)
         WHERE cc.type IS NOT NULL
         RETURN DISTINCT cc.type AS clause_type
         ORDER BY clause_type",
    )
}

// ── Similarity Search ────────────────────────────────────────────

/// Nearest excerpts to `embedding`, each traversed back to its clause and
/// agreement. Ordered by descending similarity.
pub fn similar_excerpts(index_name: &str, top_k: usize, embedding: Vec<f32>) -> Statement {
    Statement::new(
        "similar_excerpts",
        "CALL db.index.vector.queryNodes($index_name, $top_k, $embedding)
         YIELD node, score
         MATCH (a:Agreement)-[:HAS_CLAUSE]->(cc:ContractClause)-[:HAS_EXCERPT]-(node)
         RETURN a.contract_id AS contract_id,
                a.name AS agreement_name,
                cc.type AS clause_type,
                node.text AS excerpt,
                score
         ORDER BY score DESC",
    )
    .param("index_name", index_name)
    .param("top_k", top_k as i64)
    .param("embedding", embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Param;
    use serde_json::json;

    #[test]
    fn test_contract_by_id_binds_id() {
        let stmt = contract_by_id(42);
        assert_eq!(stmt.name, "contract_by_id");
        assert_eq!(stmt.get_param("contract_id"), Some(&Param::Int(42)));
        assert!(stmt.text.contains("{contract_id: $contract_id}"));
        assert!(stmt.text.contains("AS clause_types"));
    }

    #[test]
    fn test_listing_statements_project_composite_parties() {
        for stmt in [
            contracts_by_organization("orgs", "Acme"),
            contracts_with_clause_type("Non-Compete"),
            contracts_without_clause_type("Non-Compete"),
        ] {
            assert!(stmt.text.contains("AS agreement"), "{}", stmt.name);
            assert!(stmt.text.contains("incorporation_state: i.state"), "{}", stmt.name);
            assert!(!stmt.text.contains("collect(r)"), "{}", stmt.name);
        }
    }

    #[test]
    fn test_without_clause_uses_null_probe() {
        let stmt = contracts_without_clause_type("Exclusivity");
        assert!(stmt.text.contains("OPTIONAL MATCH"));
        assert!(stmt.text.contains("WHERE cc IS NULL"));
        assert_eq!(
            stmt.get_param("clause_type"),
            Some(&Param::Text("Exclusivity".to_string()))
        );
    }

    #[test]
    fn test_similar_excerpts_params() {
        let stmt = similar_excerpts("excerpt_embedding", 3, vec![0.1, 0.2]);
        assert_eq!(stmt.get_param("top_k"), Some(&Param::Int(3)));
        assert_eq!(
            stmt.get_param("index_name"),
            Some(&Param::Text("excerpt_embedding".to_string()))
        );
        assert_eq!(stmt.get_param("embedding"), Some(&Param::Vector(vec![0.1, 0.2])));
    }

    #[test]
    fn test_clause_types_is_sorted_and_distinct() {
        let stmt = clause_types();
        assert!(stmt.text.contains("DISTINCT"));
        assert!(stmt.text.contains("ORDER BY clause_type"));
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_agreement_row_decodes_party_maps() {
        let row: AgreementRow = serde_json::from_value(json!({
            "agreement": {"contract_id": 1, "name": "MSA-A", "agreement_type": "MSA"},
            "parties": [
                {"name": "Acme", "role": "Buyer", "incorporation_country": "USA", "incorporation_state": "DE"},
                {"name": "Globex", "role": "Seller", "incorporation_country": "USA", "incorporation_state": null}
            ]
        }))
        .unwrap();

        assert_eq!(row.agreement.contract_id, 1);
        assert_eq!(row.parties.len(), 2);
        assert_eq!(row.parties[1].role.as_deref(), Some("Seller"));
        assert!(row.parties[1].incorporation_state.is_none());
    }

    #[test]
    fn test_party_without_name_fails_to_decode() {
        let result: Result<AgreementRow, _> = serde_json::from_value(json!({
            "agreement": {"contract_id": 1},
            "parties": [{"role": "Buyer"}]
        }));
        assert!(result.is_err());
    }
}
