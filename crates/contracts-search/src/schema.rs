//! Hand-written description of the contracts graph, handed to the text
//! generator so it only references labels and properties that exist.

pub const GRAPH_SCHEMA: &str = "Node properties:
Agreement {agreement_type: STRING, contract_id: INTEGER, effective_date: STRING, expiration_date: STRING, renewal_term: STRING, name: STRING}
ContractClause {type: STRING}
ClauseType {name: STRING}
Country {name: STRING}
Excerpt {text: STRING}
Organization {name: STRING}

Relationship properties:
IS_PARTY_TO {role: STRING}
GOVERNED_BY_LAW {state: STRING}
HAS_CLAUSE {type: STRING}
INCORPORATED_IN {state: STRING}

The relationships:
(:Agreement)-[:HAS_CLAUSE]->(:ContractClause)
(:ContractClause)-[:HAS_EXCERPT]->(:Excerpt)
(:ContractClause)-[:HAS_TYPE]->(:ClauseType)
(:Agreement)-[:GOVERNED_BY_LAW]->(:Country)
(:Organization)-[:IS_PARTY_TO]->(:Agreement)
(:Organization)-[:INCORPORATED_IN]->(:Country)
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_every_relationship() {
        for rel in [
            "HAS_CLAUSE",
            "HAS_EXCERPT",
            "HAS_TYPE",
            "GOVERNED_BY_LAW",
            "IS_PARTY_TO",
            "INCORPORATED_IN",
        ] {
            assert!(GRAPH_SCHEMA.contains(&format!("[:{rel}]")), "{rel}");
        }
    }
}
