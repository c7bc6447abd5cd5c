//! JSON Export
//!
//! Serializes query outcomes and adopter scans.

use alloy::primitives::Address;
use serde::Serialize;

use crate::domain::AgreementDetails;
use crate::modules::adopters::Adopter;
use crate::modules::query::{OwnerLookup, QueryOutcome};

/// Exportable query outcome
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportableOutcome<'a> {
    adopted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    agreement: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a AgreementDetails>,
}

impl<'a> From<&'a QueryOutcome> for ExportableOutcome<'a> {
    fn from(outcome: &'a QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::NoAdoption { protocol } => Self {
                adopted: false,
                protocol: Some(*protocol),
                agreement: None,
                owner: None,
                owner_error: None,
                details: None,
            },
            QueryOutcome::Adopted(report) => Self {
                adopted: true,
                protocol: None,
                agreement: Some(report.agreement),
                owner: report.owner.address(),
                owner_error: match &report.owner {
                    OwnerLookup::Failed(reason) => Some(reason.as_str()),
                    OwnerLookup::Found(_) => None,
                },
                details: Some(&report.details),
            },
        }
    }
}

/// Pretty JSON for one query outcome
pub fn outcome_to_json(outcome: &QueryOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExportableOutcome::from(outcome))
}

/// Pretty JSON array of adopters
pub fn adopters_to_json(adopters: &[Adopter]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(adopters)
}
