//! Safe Harbor contract schema
//!
//! Fixed descriptors for the calls this tool makes. Each schema revision is a
//! separate descriptor; a V3 layout would get its own constructor next to
//! [`agreement_details_v2`] rather than changing it.

use std::sync::LazyLock;

use alloy::primitives::Selector;

use super::selector::selector;
use super::types::{canonical_list, AbiType, Param};

/// A contract function: name, inputs and outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
}

impl FunctionSpec {
    /// Canonical signature, e.g. `getAgreement(address)`
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, canonical_list(self.inputs.iter().map(|p| &p.ty)))
    }

    /// 4-byte selector of [`Self::signature`]
    pub fn selector(&self) -> Selector {
        selector(&self.signature())
    }

    pub fn input_types(&self) -> Vec<AbiType> {
        self.inputs.iter().map(|p| p.ty.clone()).collect()
    }

    pub fn output_types(&self) -> Vec<AbiType> {
        self.outputs.iter().map(|p| p.ty.clone()).collect()
    }
}

/// `NoAgreement()` custom error selector raised by the registry
pub const NO_AGREEMENT_SELECTOR: Selector = Selector::new([0x84, 0x3c, 0xbf, 0xa9]);

/// Registry event emitted on every adoption or agreement change
pub const SAFE_HARBOR_ADOPTION_SIGNATURE: &str = "SafeHarborAdoption(address,address,address)";

/// Registry: `getAgreement(address adopter) returns (address)`
pub static GET_AGREEMENT: LazyLock<FunctionSpec> = LazyLock::new(|| FunctionSpec {
    name: "getAgreement",
    inputs: vec![Param::new("adopter", AbiType::Address)],
    outputs: vec![Param::new("agreement", AbiType::Address)],
});

/// Agreement: `owner() returns (address)`
pub static OWNER: LazyLock<FunctionSpec> = LazyLock::new(|| FunctionSpec {
    name: "owner",
    inputs: vec![],
    outputs: vec![Param::new("owner", AbiType::Address)],
});

/// Agreement: `getDetails() returns (AgreementDetailsV2)`
pub static GET_DETAILS: LazyLock<FunctionSpec> = LazyLock::new(|| FunctionSpec {
    name: "getDetails",
    inputs: vec![],
    outputs: vec![Param::new("details", agreement_details_v2())],
});

pub fn contact() -> AbiType {
    AbiType::tuple(vec![
        Param::new("name", AbiType::String),
        Param::new("contact", AbiType::String),
    ])
}

pub fn account() -> AbiType {
    AbiType::tuple(vec![
        Param::new("accountAddress", AbiType::String),
        Param::new("childContractScope", AbiType::Uint(8)),
    ])
}

pub fn chain() -> AbiType {
    AbiType::tuple(vec![
        Param::new("assetRecoveryAddress", AbiType::String),
        Param::new("accounts", AbiType::array(account())),
        Param::new("caip2ChainId", AbiType::String),
    ])
}

pub fn bounty_terms() -> AbiType {
    AbiType::tuple(vec![
        Param::new("bountyPercentage", AbiType::Uint(256)),
        Param::new("bountyCapUSD", AbiType::Uint(256)),
        Param::new("retainable", AbiType::Bool),
        Param::new("identity", AbiType::Uint(8)),
        Param::new("diligenceRequirements", AbiType::String),
        Param::new("aggregateBountyCapUSD", AbiType::Uint(256)),
    ])
}

/// `AgreementDetailsV2` struct returned by `getDetails()`
pub fn agreement_details_v2() -> AbiType {
    AbiType::tuple(vec![
        Param::new("protocolName", AbiType::String),
        Param::new("contactDetails", AbiType::array(contact())),
        Param::new("chains", AbiType::array(chain())),
        Param::new("bountyTerms", bounty_terms()),
        Param::new("agreementURI", AbiType::String),
    ])
}

/// Non-indexed data of `SafeHarborAdoption`
pub fn adoption_event_data() -> AbiType {
    AbiType::tuple(vec![
        Param::new("oldDetails", AbiType::Address),
        Param::new("newDetails", AbiType::Address),
    ])
}
