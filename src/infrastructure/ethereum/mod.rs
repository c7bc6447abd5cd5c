//! Ethereum infrastructure - Alloy provider implementation

mod provider;

pub use provider::{create_provider, AlloyProvider, EthereumProvider, ProviderConfig, RawLog};
