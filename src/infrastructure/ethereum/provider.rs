//! Ethereum provider abstraction and Alloy implementation
//!
//! Exposes the two read-only capabilities the agreement queries need:
//! `eth_call` with revert data preserved, and `eth_getLogs` for registry
//! events.

use std::path::PathBuf;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::{Filter, TransactionRequest};
use alloy::transports::TransportError;
use anyhow::{Context, Result};
use tracing::debug;

use crate::error::CallError;

/// Log entry in a chain-agnostic shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<u64>,
    pub log_index: Option<u64>,
    pub transaction_hash: Option<B256>,
}

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Pick a transport from the endpoint string
    ///
    /// `http(s)://` and `ws(s)://` map to their transports; anything else is
    /// treated as an IPC socket path.
    pub fn from_endpoint(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        let lower = endpoint.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(ProviderConfig::Http(endpoint.to_string()));
        }
        if lower.starts_with("ws://") || lower.starts_with("wss://") {
            return Ok(ProviderConfig::WebSocket(endpoint.to_string()));
        }
        #[cfg(unix)]
        {
            Ok(ProviderConfig::Ipc(PathBuf::from(endpoint)))
        }
        #[cfg(not(unix))]
        {
            Err(anyhow::anyhow!("Unsupported endpoint '{}': IPC is not available on this platform", endpoint))
        }
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// Read-only contract access
///
/// This is the only RPC surface the orchestrator sees, so tests can swap in
/// an in-memory implementation.
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync {
    /// Execute `eth_call` against `to` with raw calldata
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, CallError>;

    /// Fetch logs emitted by `address` whose first topic is `topic0`
    async fn get_logs(
        &self,
        address: Address,
        topic0: B256,
        from_block: u64,
    ) -> Result<Vec<RawLog>, CallError>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Alloy-backed provider over any of the supported transports
pub struct AlloyProvider {
    provider: FilledProvider,
    endpoint: String,
}

/// Create a provider from configuration
pub async fn create_provider(config: ProviderConfig) -> Result<Box<dyn EthereumProvider>> {
    let endpoint = config.display();
    let provider = match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            ProviderBuilder::new().connect_http(rpc_url)
        }
        ProviderConfig::WebSocket(url) => ProviderBuilder::new()
            .connect(&url)
            .await
            .context("Failed to create WebSocket provider")?,
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc = IpcConnect::new(path.to_string_lossy().to_string());
            ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .context("Failed to create IPC provider")?
        }
    };
    Ok(Box::new(AlloyProvider { provider, endpoint }))
}

#[async_trait::async_trait]
impl EthereumProvider for AlloyProvider {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, CallError> {
        debug!(endpoint = %self.endpoint, %to, calldata = %data, "eth_call");
        let request = TransactionRequest::default().to(to).input(data.into());
        self.provider.call(request).await.map_err(classify_rpc_error)
    }

    async fn get_logs(
        &self,
        address: Address,
        topic0: B256,
        from_block: u64,
    ) -> Result<Vec<RawLog>, CallError> {
        debug!(endpoint = %self.endpoint, %address, %topic0, from_block, "eth_getLogs");
        let filter = Filter::new()
            .address(address)
            .event_signature(topic0)
            .from_block(from_block);
        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(classify_rpc_error)?;

        Ok(logs
            .into_iter()
            .map(|log| RawLog {
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
                block_number: log.block_number,
                log_index: log.log_index,
                transaction_hash: log.transaction_hash,
            })
            .collect())
    }

    fn endpoint_name(&self) -> String {
        self.endpoint.clone()
    }
}

/// Split node errors into contract reverts (with payload) and everything else
fn classify_rpc_error(err: TransportError) -> CallError {
    if let Some(payload) = err.as_error_resp() {
        if let Some(data) = payload.as_revert_data() {
            return CallError::Revert(data);
        }
        // Some nodes report a bare revert without a data field
        if payload.message.to_lowercase().contains("execution reverted") {
            return CallError::Revert(Bytes::new());
        }
    }
    CallError::Transport(err.to_string())
}
