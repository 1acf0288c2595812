//! Client configuration: target network, module address and timing.

use crate::core::constants::{DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_METADATA, DEFAULT_POLL_INTERVAL};
use crate::core::network::Network;
use crate::error::{PermissionSdkError, Result};
use crate::types::AccountAddress;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const ENV_NETWORK: &str = "PERMISSION_EXPIRY_NETWORK";
pub const ENV_MODULE_ADDRESS: &str = "PERMISSION_EXPIRY_MODULE_ADDRESS";
pub const ENV_PUBLISHER_ADDRESS: &str = "PERMISSION_EXPIRY_PUBLISHER_ADDRESS";
pub const ENV_NODE_URL: &str = "PERMISSION_EXPIRY_NODE_URL";
pub const ENV_API_KEY: &str = "PERMISSION_EXPIRY_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub network: Network,
    /// Account the `permission_expiry` module is published under
    pub module_address: AccountAddress,
    /// Overrides the network's default REST endpoint
    pub node_url: Option<String>,
    pub api_key: Option<String>,
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
    /// Metadata attached to grants that don't specify any
    pub default_metadata: String,
}

/// On-disk form; durations in milliseconds
#[derive(Debug, Deserialize)]
struct ConfigFile {
    network: Option<String>,
    module_address: String,
    node_url: Option<String>,
    api_key: Option<String>,
    confirmation_timeout_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    default_metadata: Option<String>,
}

impl ClientConfig {
    pub fn new(network: Network, module_address: AccountAddress) -> Self {
        Self {
            network,
            module_address,
            node_url: None,
            api_key: None,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_metadata: DEFAULT_METADATA.to_string(),
        }
    }

    pub fn with_node_url(mut self, url: impl Into<String>) -> Self {
        self.node_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_default_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.default_metadata = metadata.into();
        self
    }

    /// Effective REST endpoint
    pub fn node_url(&self) -> Result<String> {
        self.node_url
            .clone()
            .or_else(|| self.network.default_node_url().map(str::to_string))
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                PermissionSdkError::Config(format!(
                    "network `{}` has no default node URL; set node_url",
                    self.network
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        self.node_url()?;
        if self.poll_interval.is_zero() {
            return Err(PermissionSdkError::Config(
                "poll_interval must be greater than zero".to_string(),
            ));
        }
        if self.confirmation_timeout < self.poll_interval {
            return Err(PermissionSdkError::Config(
                "confirmation_timeout shorter than poll_interval".to_string(),
            ));
        }
        Ok(())
    }

    /// Build from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, so callers can inject their own source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network = match lookup(ENV_NETWORK) {
            Some(name) => name.parse()?,
            None => Network::Devnet,
        };

        let module_address = lookup(ENV_MODULE_ADDRESS)
            .or_else(|| lookup(ENV_PUBLISHER_ADDRESS))
            .ok_or_else(|| {
                PermissionSdkError::Config(format!(
                    "{} (or {}) is not set",
                    ENV_MODULE_ADDRESS, ENV_PUBLISHER_ADDRESS
                ))
            })?;
        let module_address = AccountAddress::parse_relaxed(&module_address)
            .map_err(|e| PermissionSdkError::Config(e.to_string()))?;

        let mut config = Self::new(network, module_address);
        config.node_url = lookup(ENV_NODE_URL);
        config.api_key = lookup(ENV_API_KEY);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(s)?;

        let network = match file.network {
            Some(name) => name.parse()?,
            None => Network::Devnet,
        };
        let module_address = AccountAddress::parse_relaxed(&file.module_address)
            .map_err(|e| PermissionSdkError::Config(e.to_string()))?;

        let mut config = Self::new(network, module_address);
        config.node_url = file.node_url;
        config.api_key = file.api_key;
        if let Some(ms) = file.confirmation_timeout_ms {
            config.confirmation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(metadata) = file.default_metadata {
            config.default_metadata = metadata;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PermissionSdkError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_defaults_to_devnet() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_MODULE_ADDRESS, "0x42")])).unwrap();
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.node_url().unwrap(), crate::core::constants::DEVNET_NODE_URL);
    }

    #[test]
    fn env_falls_back_to_publisher_address() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_NETWORK, "Testnet"),
            (ENV_PUBLISHER_ADDRESS, "0x42"),
        ]))
        .unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.module_address, AccountAddress::parse_relaxed("0x42").unwrap());
    }

    #[test]
    fn env_requires_module_address() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, PermissionSdkError::Config(_)));
    }

    #[test]
    fn custom_network_needs_node_url() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ENV_NETWORK, "staging"),
            (ENV_MODULE_ADDRESS, "0x42"),
        ]))
        .unwrap_err();
        assert!(matches!(err, PermissionSdkError::Config(_)));
    }

    #[test]
    fn toml_overrides_timing() {
        let config = ClientConfig::from_toml_str(
            r#"
            network = "local"
            module_address = "0x42"
            node_url = "http://localhost:8080/v1/"
            confirmation_timeout_ms = 5000
            poll_interval_ms = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.network, Network::Local);
        assert_eq!(config.node_url().unwrap(), "http://localhost:8080/v1");
        assert_eq!(config.confirmation_timeout, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }
}
