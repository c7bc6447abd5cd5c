//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The ABI codec (argument encoding, tuple encode/decode)
//! - Alloy-based Ethereum provider implementation

pub mod abi;
pub mod ethereum;

pub use ethereum::{create_provider, EthereumProvider, ProviderConfig, RawLog};
