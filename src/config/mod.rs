use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::error::QueryError;
use crate::modules::query::QueryTarget;

/// Legacy SafeHarborRegistryV2 on Ethereum mainnet
pub const DEFAULT_REGISTRY: &str = "0x1eaCD100B0546E433fbf4d773109cAD482c34686";

const DEMO_RPC: &str = "https://sepolia.gateway.tenderly.co";
const DEMO_AGREEMENT: &str = "0xef726071a86b2B31caa035eE3e69c567762c7364";

/// One entry of the no-argument demonstration run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoTarget {
    pub label: Option<String>,
    pub rpc: String,
    /// Agreement contract, queried directly
    pub agreement: Option<String>,
    /// Protocol address, resolved through `registry`
    pub protocol: Option<String>,
    /// Registry override for this entry
    pub registry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_registry")]
    pub registry: String,

    #[serde(default = "default_demo")]
    pub demo: Vec<DemoTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            demo: default_demo(),
        }
    }
}

impl DemoTarget {
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.agreement.clone())
            .or_else(|| self.protocol.clone())
            .unwrap_or_else(|| self.rpc.clone())
    }

    /// Direct when `agreement` is set, otherwise registry mode for `protocol`
    pub fn target(&self, default_registry: &str) -> Result<QueryTarget, QueryError> {
        if let Some(agreement) = &self.agreement {
            return QueryTarget::direct(agreement);
        }
        match &self.protocol {
            Some(protocol) => QueryTarget::registry(
                self.registry.as_deref().unwrap_or(default_registry),
                protocol,
            ),
            None => Err(QueryError::InvalidArgument(format!(
                "demo entry '{}' needs an agreement or protocol address",
                self.display_label()
            ))),
        }
    }
}

fn default_registry() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_demo() -> Vec<DemoTarget> {
    vec![DemoTarget {
        label: Some("Sepolia example agreement".to_string()),
        rpc: DEMO_RPC.to_string(),
        agreement: Some(DEMO_AGREEMENT.to_string()),
        protocol: None,
        registry: None,
    }]
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), %err, "ignoring unreadable config");
        Config::default()
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SAFE_HARBOR_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("safe-harbor").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("safe-harbor").join("config.toml"));
    }

    directories::ProjectDirs::from("org", "seal", "safe-harbor")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.registry, DEFAULT_REGISTRY);
        assert_eq!(config.demo.len(), 1);
        assert!(matches!(
            config.demo[0].target(&config.registry),
            Ok(QueryTarget::Direct { .. })
        ));
    }

    #[test]
    fn test_demo_entries() {
        let config = parse(
            r#"
            registry = "0x1eaCD100B0546E433fbf4d773109cAD482c34686"

            [[demo]]
            label = "registry lookup"
            rpc = "https://eth.example"
            protocol = "0x742d35cc6634c0532925a3b844bc9e7595f0beb0"

            [[demo]]
            rpc = "https://eth.example"
            protocol = "0x742d35cc6634c0532925a3b844bc9e7595f0beb0"
            registry = "0x1eaCD100B0546E433fbf4d773109cAD482c346860"
            "#,
        )
        .unwrap();

        assert_eq!(config.demo[0].display_label(), "registry lookup");
        assert!(matches!(
            config.demo[0].target(&config.registry),
            Ok(QueryTarget::Registry { .. })
        ));
        // 41 hex characters in the registry override
        assert!(matches!(
            config.demo[1].target(&config.registry),
            Err(QueryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_entry_without_address() {
        let entry = DemoTarget {
            label: None,
            rpc: "https://eth.example".into(),
            agreement: None,
            protocol: None,
            registry: None,
        };
        assert!(matches!(
            entry.target(DEFAULT_REGISTRY),
            Err(QueryError::InvalidArgument(_))
        ));
    }
}
