//! Export Module
//!
//! Presentation of query results:
//! - text: human-readable agreement report
//! - json: structured export of the agreement record tree

mod json_export;
mod text;

pub use json_export::{adopters_to_json, outcome_to_json};
pub use text::{render_adopters, render_details, render_no_adoption, render_report};
