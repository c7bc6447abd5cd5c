//! Human-readable report rendering

use std::fmt::Write;

use alloy::primitives::Address;

use crate::domain::agreement::group_thousands;
use crate::domain::AgreementDetails;
use crate::modules::adopters::Adopter;
use crate::modules::query::{AgreementReport, OwnerLookup};

const RULE: &str = "==================================================";

/// Render a decoded agreement with its owner and payload size header
pub fn render_report(report: &AgreementReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Agreement: {}", report.agreement);
    match &report.owner {
        OwnerLookup::Found(owner) => {
            let _ = writeln!(out, "Agreement Owner: {}", owner);
        }
        OwnerLookup::Failed(reason) => {
            let _ = writeln!(out, "Could not get owner: {}", reason);
        }
    }
    let _ = writeln!(out, "Got agreement details ({} bytes)", report.raw_len);
    out.push_str(&render_details(&report.details));
    out
}

/// Render the agreement body
pub fn render_details(details: &AgreementDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "SAFE HARBOR V2 AGREEMENT DETAILS");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Protocol Name: {}", details.protocol_name);
    let _ = writeln!(out);

    let _ = writeln!(out, "Contact Details:");
    for (i, contact) in details.contacts.iter().enumerate() {
        let _ = writeln!(out, "  Contact {}:", i + 1);
        let _ = writeln!(out, "    Name: {}", contact.name);
        let _ = writeln!(out, "    Info: {}", contact.contact_info);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Chains:");
    if details.chains.is_empty() {
        let _ = writeln!(out, "  No chains configured in this agreement yet.");
        let _ = writeln!(
            out,
            "  The agreement owner needs to add chains using the addChains() function."
        );
    }
    for (i, chain) in details.chains.iter().enumerate() {
        let _ = writeln!(out, "  Chain {}:", i + 1);
        let _ = writeln!(out, "    Asset Recovery Address: {}", chain.asset_recovery_address);
        let _ = writeln!(out, "    CAIP-2 Chain ID: {}", chain.caip2_chain_id);
        let _ = writeln!(out, "    Accounts ({}):", chain.accounts.len());
        for (j, account) in chain.accounts.iter().enumerate() {
            let _ = writeln!(out, "      Account {}:", j + 1);
            let _ = writeln!(out, "        Address: {}", account.account_address);
            let _ = writeln!(
                out,
                "        Child Contract Scope: {} ({})",
                account.child_contract_scope.ordinal(),
                account.child_contract_scope
            );
        }
        let _ = writeln!(out);
    }
    if details.chains.is_empty() {
        let _ = writeln!(out);
    }

    let terms = &details.bounty_terms;
    let _ = writeln!(out, "Bounty Terms:");
    let _ = writeln!(out, "  Bounty Percentage: {}%", terms.bounty_percentage);
    let _ = writeln!(out, "  Bounty Cap (USD): ${}", group_thousands(&terms.bounty_cap_usd));
    let _ = writeln!(out, "  Retainable: {}", terms.retainable);
    let _ = writeln!(
        out,
        "  Identity Requirements: {} ({})",
        terms.identity_requirement.ordinal(),
        terms.identity_requirement
    );
    let _ = writeln!(out, "  Diligence Requirements: {}", terms.diligence_requirements);
    let _ = writeln!(out, "  Aggregate Bounty Cap: {}", terms.aggregate_bounty_cap_usd);
    let _ = writeln!(out);

    let _ = writeln!(out, "Agreement URI:");
    let _ = writeln!(out, "  {}", details.agreement_uri);
    let _ = writeln!(out, "{}", RULE);
    out
}

pub fn render_no_adoption(protocol: Address) -> String {
    format!("No Safe Harbor adoption found for {}\n", protocol)
}

/// Render the adopter scan as a divided list, then the entity addresses as
/// a JSON array
pub fn render_adopters(adopters: &[Adopter]) -> String {
    let divider = "-".repeat(80);
    let mut out = String::new();
    let _ = writeln!(out, "Adopters ({}):", adopters.len());
    let _ = writeln!(out, "{}", divider);
    for adopter in adopters {
        let _ = writeln!(out, "Entity: {}", adopter.entity);
        let _ = writeln!(out, "Agreement: {}", adopter.agreement_address);
        let _ = writeln!(out, "Block: {}", adopter.block_number);
        if let Some(tx) = adopter.transaction_hash {
            let _ = writeln!(out, "Tx: {}", tx);
        }
        let _ = writeln!(out, "{}", divider);
    }

    let entities: Vec<Address> = adopters.iter().map(|a| a.entity).collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "Entity addresses for migration:");
    let _ = writeln!(out, "{}", serde_json::to_string_pretty(&entities).unwrap_or_default());
    out
}
