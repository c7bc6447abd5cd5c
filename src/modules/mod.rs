//! Feature modules
//!
//! - query: registry lookup, owner lookup and agreement detail fetch
//! - adopters: historical adoption log scan
//! - export: text and JSON rendering of results

pub mod adopters;
pub mod export;
pub mod query;
