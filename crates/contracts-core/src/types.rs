//! Contract domain records returned by the search layer.
//!
//! Records are assembled fresh for every query. Optional fields are left out
//! of the JSON form so a short-shape agreement never advertises dates or
//! clauses it was not asked to carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContractsError;

// ── Agreement ─────────────────────────────────────────────────────

/// A contract with its identifying metadata, parties, and clauses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agreement {
    pub contract_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parties: Option<Vec<Party>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clauses: Option<Vec<ContractClause>>,
}

/// An organization bound to an agreement.
///
/// Parties only exist in the context of the agreement that carries them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub incorporation_country: Option<String>,
    #[serde(default)]
    pub incorporation_state: Option<String>,
}

/// A typed contractual provision, optionally backed by excerpts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractClause {
    pub clause_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpts: Option<Vec<String>>,
}

impl ContractClause {
    /// A clause carrying only its type.
    pub fn typed(clause_type: impl Into<String>) -> Self {
        Self {
            clause_type: clause_type.into(),
            excerpts: None,
        }
    }

    /// A clause carrying its supporting excerpt texts.
    pub fn with_excerpts(clause_type: impl Into<String>, excerpts: Vec<String>) -> Self {
        Self {
            clause_type: clause_type.into(),
            excerpts: Some(excerpts),
        }
    }
}

// ── Clause Types ──────────────────────────────────────────────────

/// Clause categories stored on `ContractClause.type`.
///
/// Labels outside the known catalog are kept verbatim in `Other`, so any
/// value returned by the clause type catalog can be fed back into a
/// filtered query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ClauseType {
    AntiAssignment,
    CompetitiveRestrictionException,
    NonCompete,
    Exclusivity,
    NoSolicitOfCustomers,
    NoSolicitOfEmployees,
    NonDisparagement,
    TerminationForConvenience,
    RofrRofoRofn,
    ChangeOfControl,
    RevenueProfitSharing,
    PriceRestrictions,
    MinimumCommitment,
    VolumeRestriction,
    IpOwnershipAssignment,
    JointIpOwnership,
    LicenseGrant,
    NonTransferableLicense,
    AffiliateLicenseLicensor,
    AffiliateLicenseLicensee,
    UnlimitedLicense,
    IrrevocableOrPerpetualLicense,
    SourceCodeEscrow,
    PostTerminationServices,
    AuditRights,
    UncappedLiability,
    CapOnLiability,
    LiquidatedDamages,
    WarrantyDuration,
    Insurance,
    CovenantNotToSue,
    ThirdPartyBeneficiary,
    Other(String),
}

impl ClauseType {
    /// The label as stored in the graph.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AntiAssignment => "Anti-Assignment",
            Self::CompetitiveRestrictionException => "Competitive Restriction Exception",
            Self::NonCompete => "Non-Compete",
            Self::Exclusivity => "Exclusivity",
            Self::NoSolicitOfCustomers => "No-Solicit Of Customers",
            Self::NoSolicitOfEmployees => "No-Solicit Of Employees",
            Self::NonDisparagement => "Non-Disparagement",
            Self::TerminationForConvenience => "Termination For Convenience",
            Self::RofrRofoRofn => "Rofr/Rofo/Rofn",
            Self::ChangeOfControl => "Change Of Control",
            Self::RevenueProfitSharing => "Revenue/Profit Sharing",
            Self::PriceRestrictions => "Price Restrictions",
            Self::MinimumCommitment => "Minimum Commitment",
            Self::VolumeRestriction => "Volume Restriction",
            Self::IpOwnershipAssignment => "Ip Ownership Assignment",
            Self::JointIpOwnership => "Joint Ip Ownership",
            Self::LicenseGrant => "License Grant",
            Self::NonTransferableLicense => "Non-Transferable License",
            Self::AffiliateLicenseLicensor => "Affiliate License-Licensor",
            Self::AffiliateLicenseLicensee => "Affiliate License-Licensee",
            Self::UnlimitedLicense => "Unlimited/All-You-Can-Eat-License",
            Self::IrrevocableOrPerpetualLicense => "Irrevocable Or Perpetual License",
            Self::SourceCodeEscrow => "Source Code Escrow",
            Self::PostTerminationServices => "Post-Termination Services",
            Self::AuditRights => "Audit Rights",
            Self::UncappedLiability => "Uncapped Liability",
            Self::CapOnLiability => "Cap On Liability",
            Self::LiquidatedDamages => "Liquidated Damages",
            Self::WarrantyDuration => "Warranty Duration",
            Self::Insurance => "Insurance",
            Self::CovenantNotToSue => "Covenant Not To Sue",
            Self::ThirdPartyBeneficiary => "Third Party Beneficiary",
            Self::Other(label) => label,
        }
    }

    /// Resolve a label against the catalog, ignoring surrounding whitespace.
    ///
    /// Matching is exact: the graph compares labels case-sensitively, so a
    /// label spelled differently from the catalog stays verbatim in `Other`.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed {
            "Anti-Assignment" => Self::AntiAssignment,
            "Competitive Restriction Exception" => Self::CompetitiveRestrictionException,
            "Non-Compete" => Self::NonCompete,
            "Exclusivity" => Self::Exclusivity,
            "No-Solicit Of Customers" => Self::NoSolicitOfCustomers,
            "No-Solicit Of Employees" => Self::NoSolicitOfEmployees,
            "Non-Disparagement" => Self::NonDisparagement,
            "Termination For Convenience" => Self::TerminationForConvenience,
            "Rofr/Rofo/Rofn" => Self::RofrRofoRofn,
            "Change Of Control" => Self::ChangeOfControl,
            "Revenue/Profit Sharing" => Self::RevenueProfitSharing,
            "Price Restrictions" => Self::PriceRestrictions,
            "Minimum Commitment" => Self::MinimumCommitment,
            "Volume Restriction" => Self::VolumeRestriction,
            "Ip Ownership Assignment" => Self::IpOwnershipAssignment,
            "Joint Ip Ownership" => Self::JointIpOwnership,
            "License Grant" => Self::LicenseGrant,
            "Non-Transferable License" => Self::NonTransferableLicense,
            "Affiliate License-Licensor" => Self::AffiliateLicenseLicensor,
            "Affiliate License-Licensee" => Self::AffiliateLicenseLicensee,
            "Unlimited/All-You-Can-Eat-License" => Self::UnlimitedLicense,
            "Irrevocable Or Perpetual License" => Self::IrrevocableOrPerpetualLicense,
            "Source Code Escrow" => Self::SourceCodeEscrow,
            "Post-Termination Services" => Self::PostTerminationServices,
            "Audit Rights" => Self::AuditRights,
            "Uncapped Liability" => Self::UncappedLiability,
            "Cap On Liability" => Self::CapOnLiability,
            "Liquidated Damages" => Self::LiquidatedDamages,
            "Warranty Duration" => Self::WarrantyDuration,
            "Insurance" => Self::Insurance,
            "Covenant Not To Sue" => Self::CovenantNotToSue,
            "Third Party Beneficiary" => Self::ThirdPartyBeneficiary,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClauseType {
    type Err = ContractsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ContractsError::InvalidClauseType(s.to_string()));
        }
        Ok(Self::from_label(s))
    }
}

impl From<String> for ClauseType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<ClauseType> for String {
    fn from(clause_type: ClauseType) -> Self {
        clause_type.as_str().to_string()
    }
}
