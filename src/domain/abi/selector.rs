//! Function selector calculation

use alloy::primitives::{keccak256, Selector, B256};

/// First 4 bytes of keccak256 over a canonical signature.
///
/// The signature must already be canonical: exact parameter types, no spaces,
/// no return clause (`getAgreement(address)`).
pub fn selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}

/// Full keccak256 of an event signature (log topic0)
pub fn event_topic(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}
