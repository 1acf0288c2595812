use crate::core::constants::{DEVNET_NODE_URL, LOCAL_NODE_URL, MAINNET_NODE_URL, TESTNET_NODE_URL};
use crate::error::{PermissionSdkError, Result};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named network environments the client can target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Network {
    Devnet,
    Testnet,
    Mainnet,
    Local,
    /// Any other named network. Requires an explicit node URL.
    Custom(String),
}

impl Network {
    pub fn name(&self) -> &str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Local => "local",
            Network::Custom(name) => name.as_str(),
        }
    }

    /// Default REST endpoint, `None` for custom networks
    pub fn default_node_url(&self) -> Option<&'static str> {
        match self {
            Network::Devnet => Some(DEVNET_NODE_URL),
            Network::Testnet => Some(TESTNET_NODE_URL),
            Network::Mainnet => Some(MAINNET_NODE_URL),
            Network::Local => Some(LOCAL_NODE_URL),
            Network::Custom(_) => None,
        }
    }

    /// Wallet adapters report names with varying case ("Devnet", "devnet")
    pub fn matches_name(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = PermissionSdkError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(PermissionSdkError::Config("empty network name".to_string()));
        }
        Ok(match name.to_ascii_lowercase().as_str() {
            "devnet" => Network::Devnet,
            "testnet" => Network::Testnet,
            "mainnet" => Network::Mainnet,
            "local" | "localnet" => Network::Local,
            _ => Network::Custom(name.to_string()),
        })
    }
}

impl TryFrom<String> for Network {
    type Error = PermissionSdkError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Network> for String {
    fn from(network: Network) -> Self {
        network.name().to_string()
    }
}

/// Account exposed by a connected wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: AccountAddress,
    /// Network name as reported by the wallet, if it reports one
    pub network: Option<String>,
}

/// Wallet connection state, passed explicitly instead of read from ambient UI state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(WalletAccount),
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    pub fn account(&self) -> Option<&WalletAccount> {
        match self {
            ConnectionState::Connected(account) => Some(account),
            _ => None,
        }
    }

    /// Connected account, or `NotConnected`
    pub fn require_account(&self) -> Result<&WalletAccount> {
        self.account().ok_or(PermissionSdkError::NotConnected)
    }
}

/// Reject a wallet that reports a network other than `expected`.
///
/// A wallet that reports no network is let through; the node will reject
/// mismatched chain ids anyway. This is a convenience guard, not authorization.
pub fn ensure_network(expected: &Network, reported: Option<&str>) -> Result<()> {
    match reported {
        Some(actual) if !expected.matches_name(actual) => {
            tracing::warn!(expected = %expected, actual, "wallet connected to wrong network");
            Err(PermissionSdkError::WrongNetwork {
                expected: expected.clone(),
                actual: actual.to_string(),
            })
        },
        _ => Ok(()),
    }
}
