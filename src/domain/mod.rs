//! Domain layer - ABI models and Safe Harbor agreement records

pub mod abi;
pub mod agreement;

pub use agreement::{
    Account, AgreementDetails, AggregateCap, BountyTerms, Chain, ChildContractScope, Contact,
    EnumOrdinal, IdentityRequirement,
};
