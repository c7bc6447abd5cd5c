//! Safe Harbor agreement checker
//!
//! Looks up whether a protocol has adopted a Safe Harbor agreement through
//! the on-chain registry, then fetches and decodes the agreement's
//! `AgreementDetailsV2` terms with a small ABI codec.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod modules;

pub use domain::AgreementDetails;
pub use error::{CallError, CodecError, ProjectionError, QueryError};
pub use modules::query::{AgreementQuery, AgreementReport, OwnerLookup, QueryOutcome, QueryTarget};
