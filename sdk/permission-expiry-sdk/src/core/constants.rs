use std::time::Duration;

// Name of the Move module the registry is published under
pub const MODULE_NAME: &str = "permission_expiry";

pub const SECONDS_PER_HOUR: u64 = 3600;

pub const DEVNET_NODE_URL: &str = "https://api.devnet.aptoslabs.com/v1";
pub const TESTNET_NODE_URL: &str = "https://api.testnet.aptoslabs.com/v1";
pub const MAINNET_NODE_URL: &str = "https://api.mainnet.aptoslabs.com/v1";
pub const LOCAL_NODE_URL: &str = "http://127.0.0.1:8080/v1";

pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_METADATA: &str = "No metadata provided";

// Address length including the `0x` prefix
pub const ADDRESS_STR_LEN: usize = 66;
