//! Assembly of nested agreement records from decoded graph rows.

use std::collections::BTreeMap;

use contracts_core::{Agreement, ContractClause, Party};
use contracts_graph::queries::{AgreementNode, ExcerptHit, ExcerptRecord};

/// Clause data for a long-shape agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseInput {
    /// One clause per entry, type only.
    Types(Vec<String>),
    /// One clause per distinct type, carrying every excerpt under it.
    Excerpts(BTreeMap<String, Vec<String>>),
}

/// Which agreement fields an assembly populates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// contract_id, name, agreement_type, parties.
    Short,
    /// Short fields plus dates, renewal term, and clauses.
    Long(ClauseInput),
}

/// Build an agreement record in the requested projection.
///
/// Parties keep the order the statement produced them in.
pub fn assemble(node: AgreementNode, parties: Vec<Party>, projection: Projection) -> Agreement {
    let mut agreement = Agreement {
        contract_id: node.contract_id,
        name: node.name.unwrap_or_default(),
        agreement_type: node.agreement_type,
        parties: Some(parties),
        ..Default::default()
    };

    if let Projection::Long(clauses) = projection {
        agreement.effective_date = node.effective_date;
        agreement.expiration_date = node.expiration_date;
        agreement.renewal_term = node.renewal_term;
        agreement.clauses = Some(match clauses {
            ClauseInput::Types(types) => types.into_iter().map(ContractClause::typed).collect(),
            ClauseInput::Excerpts(by_type) => by_type
                .into_iter()
                .map(|(clause_type, excerpts)| ContractClause::with_excerpts(clause_type, excerpts))
                .collect(),
        });
    }

    agreement
}

/// Group excerpt texts by clause type. Excerpts without text are dropped;
/// duplicates within a type are kept.
pub fn group_excerpts(records: Vec<ExcerptRecord>) -> BTreeMap<String, Vec<String>> {
    let mut by_type: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in records {
        if let Some(text) = record.text {
            by_type
                .entry(record.clause_type.unwrap_or_default())
                .or_default()
                .push(text);
        }
    }
    by_type
}

/// The partial record for one similarity hit: contract_id, name, and a
/// single clause holding the matched excerpt. No other field is set.
pub fn partial_from_hit(hit: ExcerptHit) -> Agreement {
    Agreement {
        contract_id: hit.contract_id,
        name: hit.agreement_name.unwrap_or_default(),
        clauses: Some(vec![ContractClause::with_excerpts(
            hit.clause_type.unwrap_or_default(),
            hit.excerpt.into_iter().collect(),
        )]),
        ..Default::default()
    }
}
