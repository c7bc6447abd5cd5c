//! Safe Harbor agreement records
//!
//! Named views over a decoded `AgreementDetailsV2` value. Enum ordinals are
//! kept as data; out-of-range ordinals render as `Unknown(n)`.

use std::fmt;

use alloy::primitives::U256;
use serde::{Serialize, Serializer};

use crate::domain::abi::AbiValue;
use crate::error::ProjectionError;

const CHILD_CONTRACT_SCOPE_NAMES: [&str; 4] = ["None", "ExistingOnly", "All", "FutureOnly"];
const IDENTITY_REQUIREMENT_NAMES: [&str; 3] = ["Anonymous", "Pseudonymous", "Named"];

/// An enum ordinal resolved against a fixed name table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumOrdinal {
    ordinal: U256,
    name: Option<&'static str>,
}

impl EnumOrdinal {
    fn resolve(ordinal: U256, names: &'static [&'static str]) -> Self {
        let name = usize::try_from(ordinal).ok().and_then(|idx| names.get(idx)).copied();
        Self { ordinal, name }
    }

    pub fn ordinal(&self) -> U256 {
        self.ordinal
    }

    /// Known variant name, `None` when the ordinal is out of range
    pub fn known_name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn is_known(&self) -> bool {
        self.name.is_some()
    }
}

impl fmt::Display for EnumOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "Unknown({})", self.ordinal),
        }
    }
}

impl Serialize for EnumOrdinal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Account.childContractScope
pub type ChildContractScope = EnumOrdinal;
/// BountyTerms.identity
pub type IdentityRequirement = EnumOrdinal;

/// Aggregate bounty cap; zero on-chain means no limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateCap {
    NoLimit,
    Usd(U256),
}

impl From<U256> for AggregateCap {
    fn from(value: U256) -> Self {
        if value.is_zero() {
            AggregateCap::NoLimit
        } else {
            AggregateCap::Usd(value)
        }
    }
}

impl fmt::Display for AggregateCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateCap::NoLimit => f.write_str("No limit"),
            AggregateCap::Usd(value) => write!(f, "${}", group_thousands(value)),
        }
    }
}

impl Serialize for AggregateCap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AggregateCap::NoLimit => serializer.serialize_str("No limit"),
            AggregateCap::Usd(value) => serializer.collect_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    pub contact_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_address: String,
    pub child_contract_scope: ChildContractScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub asset_recovery_address: String,
    pub accounts: Vec<Account>,
    pub caip2_chain_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyTerms {
    #[serde(serialize_with = "as_decimal")]
    pub bounty_percentage: U256,
    #[serde(rename = "bountyCapUSD", serialize_with = "as_decimal")]
    pub bounty_cap_usd: U256,
    pub retainable: bool,
    pub identity_requirement: IdentityRequirement,
    pub diligence_requirements: String,
    #[serde(rename = "aggregateBountyCapUSD")]
    pub aggregate_bounty_cap_usd: AggregateCap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementDetails {
    pub protocol_name: String,
    pub contacts: Vec<Contact>,
    pub chains: Vec<Chain>,
    pub bounty_terms: BountyTerms,
    #[serde(rename = "agreementURI")]
    pub agreement_uri: String,
}

impl AgreementDetails {
    /// Project a decoded `AgreementDetailsV2` tuple
    pub fn from_abi(value: &AbiValue) -> Result<Self, ProjectionError> {
        Ok(Self {
            protocol_name: string_field(value, "protocolName")?,
            contacts: array_field(value, "contactDetails")?
                .iter()
                .map(Contact::from_abi)
                .collect::<Result<_, _>>()?,
            chains: array_field(value, "chains")?
                .iter()
                .map(Chain::from_abi)
                .collect::<Result<_, _>>()?,
            bounty_terms: BountyTerms::from_abi(field(value, "bountyTerms")?)?,
            agreement_uri: string_field(value, "agreementURI")?,
        })
    }

    /// Total number of accounts across all chains
    pub fn account_count(&self) -> usize {
        self.chains.iter().map(|c| c.accounts.len()).sum()
    }
}

impl Contact {
    fn from_abi(value: &AbiValue) -> Result<Self, ProjectionError> {
        Ok(Self {
            name: string_field(value, "name")?,
            contact_info: string_field(value, "contact")?,
        })
    }
}

impl Account {
    fn from_abi(value: &AbiValue) -> Result<Self, ProjectionError> {
        Ok(Self {
            account_address: string_field(value, "accountAddress")?,
            child_contract_scope: EnumOrdinal::resolve(
                uint_field(value, "childContractScope")?,
                &CHILD_CONTRACT_SCOPE_NAMES,
            ),
        })
    }
}

impl Chain {
    fn from_abi(value: &AbiValue) -> Result<Self, ProjectionError> {
        Ok(Self {
            asset_recovery_address: string_field(value, "assetRecoveryAddress")?,
            accounts: array_field(value, "accounts")?
                .iter()
                .map(Account::from_abi)
                .collect::<Result<_, _>>()?,
            caip2_chain_id: string_field(value, "caip2ChainId")?,
        })
    }
}

impl BountyTerms {
    fn from_abi(value: &AbiValue) -> Result<Self, ProjectionError> {
        Ok(Self {
            bounty_percentage: uint_field(value, "bountyPercentage")?,
            bounty_cap_usd: uint_field(value, "bountyCapUSD")?,
            retainable: field(value, "retainable")?
                .as_bool()
                .ok_or(ProjectionError::WrongKind {
                    field: "retainable",
                    expected: "bool",
                })?,
            identity_requirement: EnumOrdinal::resolve(
                uint_field(value, "identity")?,
                &IDENTITY_REQUIREMENT_NAMES,
            ),
            diligence_requirements: string_field(value, "diligenceRequirements")?,
            aggregate_bounty_cap_usd: uint_field(value, "aggregateBountyCapUSD")?.into(),
        })
    }
}

fn field<'a>(value: &'a AbiValue, name: &'static str) -> Result<&'a AbiValue, ProjectionError> {
    value.field(name).ok_or(ProjectionError::MissingField(name))
}

fn string_field(value: &AbiValue, name: &'static str) -> Result<String, ProjectionError> {
    field(value, name)?
        .as_str()
        .map(str::to_string)
        .ok_or(ProjectionError::WrongKind {
            field: name,
            expected: "string",
        })
}

fn uint_field(value: &AbiValue, name: &'static str) -> Result<U256, ProjectionError> {
    field(value, name)?.as_uint().ok_or(ProjectionError::WrongKind {
        field: name,
        expected: "uint",
    })
}

fn array_field<'a>(value: &'a AbiValue, name: &'static str) -> Result<&'a [AbiValue], ProjectionError> {
    field(value, name)?.as_array().ok_or(ProjectionError::WrongKind {
        field: name,
        expected: "array",
    })
}

fn as_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Decimal with `,` thousands separators, e.g. `1,000,000`
pub fn group_thousands(value: &U256) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
