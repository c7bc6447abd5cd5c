//! ABI domain models
//!
//! Type descriptors, decoded values and the fixed Safe Harbor schema,
//! independent of the codec that walks them.

pub mod schema;
mod selector;
mod types;
mod value;

pub use schema::{FunctionSpec, NO_AGREEMENT_SELECTOR};
pub use selector::{event_topic, selector};
pub use types::{canonical_list, AbiType, Param, WORD};
pub use value::AbiValue;
